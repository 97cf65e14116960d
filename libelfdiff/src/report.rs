use std::fmt::Display;
use std::io::Write;
/////////////////////////////////////////
use crate::changes::ChangeMap;
use crate::records::SymbolRecord;
/////////////////////////////////////////

pub const CHANGE_COLUMNS: &[&str] = &["old", "new", "diff", "change"];
pub const SYMBOL_COLUMNS: &[&str] = &["address", "size"];

const NAME_WIDTH: usize = 30;
const CELL_WIDTH: usize = 10;

const SORTTABLE_SCRIPT: &str = "https://www.kryogenix.org/code/browser/sorttable/sorttable.js";

const HTML_STYLE: &str = r#"<style>
table {
  border-spacing: 0;
  width: 100%;
  border: 1px solid #ddd;
}

th {
  cursor: pointer;
}

th, td {
  text-align: left;
  padding: 16px;
}

tr:nth-child(even) {
  background-color: #f2f2f2
}
</style>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Right-aligned in text output.
    Int(i128),
    /// Left-aligned in text output.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// A titled table with a leading `name` column, rendered as fixed-width text
/// or as HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Rows follow the iteration order of `changes`.
    pub fn from_changes(title: &str, changes: &ChangeMap) -> Self {
        let rows = changes
            .values()
            .map(|change| Row {
                name: change.name.clone(),
                cells: vec![
                    Cell::Int(i128::from(change.old_size)),
                    Cell::Int(i128::from(change.new_size)),
                    Cell::Int(change.diff),
                    Cell::Text(change.kind.to_string()),
                ],
            })
            .collect();
        Table {
            title: title.to_string(),
            columns: CHANGE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn from_symbols(title: &str, symbols: &[&SymbolRecord]) -> Self {
        let rows = symbols
            .iter()
            .map(|symbol| Row {
                name: symbol.name.clone(),
                cells: vec![
                    Cell::Text(format!("{:#x}", symbol.address)),
                    Cell::Int(i128::from(symbol.size)),
                ],
            })
            .collect();
        Table {
            title: title.to_string(),
            columns: SYMBOL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", self.title)?;
        write!(out, "{:<w$}", "name", w = NAME_WIDTH)?;
        for column in &self.columns {
            write!(out, " | {:<w$}", column, w = CELL_WIDTH)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", "-".repeat(12 * (self.columns.len() + 3)))?;
        for row in &self.rows {
            write!(out, "{:<w$}", row.name, w = NAME_WIDTH)?;
            for cell in &row.cells {
                match cell {
                    Cell::Int(value) => write!(out, " | {:>w$}", value, w = CELL_WIDTH)?,
                    Cell::Text(text) => write!(out, " | {:<w$}", text, w = CELL_WIDTH)?,
                }
            }
            writeln!(out)?;
        }
        write!(out, "\n\n")
    }

    pub fn write_html<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "<h2>{}</h2>", escape_html(&self.title))?;
        writeln!(out, "<table class=\"sortable\">")?;
        writeln!(out, "<tr>")?;
        writeln!(out, "<th>name</th>")?;
        for column in &self.columns {
            writeln!(out, "<th>{}</th>", escape_html(column))?;
        }
        writeln!(out, "</tr>")?;
        for row in &self.rows {
            write!(out, "<tr><td>{}</td>", escape_html(&row.name))?;
            for cell in &row.cells {
                write!(out, "<td>{}</td>", escape_html(cell))?;
            }
            writeln!(out, "</tr>")?;
        }
        writeln!(out, "</table>")
    }
}

/// Full standalone page around `tables`. Column sorting is left to an
/// external script referenced from the page.
pub fn write_html_document<W: Write>(
    out: &mut W,
    old_label: &str,
    new_label: &str,
    tables: &[Table],
) -> std::io::Result<()> {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>")?;
    writeln!(out, "<head>")?;
    writeln!(
        out,
        "<title>Elf Changes {} - {}</title>",
        escape_html(old_label),
        escape_html(new_label)
    )?;
    writeln!(out, "{}", HTML_STYLE)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<script src=\"{}\"></script>", SORTTABLE_SCRIPT)?;
    for table in tables {
        table.write_html(out)?;
    }
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn escape_html(value: impl Display) -> String {
    let mut escaped = String::new();
    for c in value.to_string().chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Int(value) => write!(f, "{}", value),
            Cell::Text(text) => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape_html(Cell::Int(-4)), "-4");
    }

    #[test]
    fn test_text_cell_alignment() {
        let table = Table {
            title: "T".to_string(),
            columns: vec!["n".to_string(), "s".to_string()],
            rows: vec![Row {
                name: "x".to_string(),
                cells: vec![Cell::Int(-4), Cell::Text("ab".to_string())],
            }],
        };
        let mut out = Vec::new();
        table.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(3).unwrap();
        assert_eq!(row, format!("{:<30} |         -4 | ab        ", "x"));
    }
}
