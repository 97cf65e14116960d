/////////////////////////////////////////
use log::{debug, trace};
/////////////////////////////////////////
use crate::records::{RecordMap, SectionRecord, Snapshot, SymbolRecord};
/////////////////////////////////////////

/*
The extractor understands two blocks of `readelf -a` output:

Section Headers:
  [Nr] Name              Type            Addr     Off    Size   ES Flg Lk Inf Al
  [ 0]                   NULL            00000000 000000 000000 00      0   0  0
  [ 1] .vectors          PROGBITS        00000000 010000 0007d0 00  AX  0   0  8

Symbol table '.symtab' contains 637 entries:
   Num:    Value  Size Type    Bind   Vis      Ndx Name
   613: 3ed02e00    56 FUNC    GLOBAL DEFAULT    2 xTaskGetSchedulerState
   614: 3ed04b08   257 OBJECT  GLOBAL DEFAULT    5 _ctype_

Everything else in the dump is ignored. The format is not a stable contract,
so rows that do not have the expected shape are dropped instead of reported.
*/

const SECTION_TABLE_MARKER: &str = "Section Headers:";
const SYMBOL_TABLE_MARKER: &str = "Symbol table ";

/// Builds a snapshot from the full text of one dump. Never fails: a dump with
/// no recognizable tables gives an empty snapshot.
pub fn extract_snapshot(dump: &str) -> Snapshot {
    Snapshot::new(extract_sections(dump.lines()), extract_symbols(dump.lines()))
}

/// Section pass. A table starts after a line containing the header marker and
/// ends at the first blank line; scanning then resumes looking for the marker.
pub fn extract_sections<'a, I>(lines: I) -> RecordMap<SectionRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sections = RecordMap::new();
    let mut in_table = false;
    let (mut matched, mut skipped) = (0usize, 0usize);
    for line in lines {
        if !in_table {
            in_table = line.contains(SECTION_TABLE_MARKER);
            continue;
        }
        if line.trim().is_empty() {
            in_table = false;
            continue;
        }
        match match_section_row(line) {
            Some(section) => {
                matched += 1;
                sections.insert(section.name.clone(), section);
            }
            None => {
                skipped += 1;
                trace!("section pass: skipping line {:?}", line);
            }
        }
    }
    debug!(
        "section pass: {} rows matched, {} lines skipped, {} unique sections",
        matched,
        skipped,
        sections.len()
    );
    sections
}

/// Symbol pass. Every symbol table in the dump is merged into one mapping.
/// Unlike the section pass there is no end-of-table marker: once a header has
/// been seen, every following line is a candidate row.
pub fn extract_symbols<'a, I>(lines: I) -> RecordMap<SymbolRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut symbols = RecordMap::new();
    let mut in_table = false;
    let (mut tables, mut matched, mut skipped) = (0usize, 0usize, 0usize);
    for line in lines {
        if line.starts_with(SYMBOL_TABLE_MARKER) {
            in_table = true;
            tables += 1;
            continue;
        }
        if !in_table {
            continue;
        }
        match match_symbol_row(line) {
            Some(symbol) => {
                matched += 1;
                symbols.insert(symbol.name.clone(), symbol);
            }
            None => {
                skipped += 1;
                trace!("symbol pass: skipping line {:?}", line);
            }
        }
    }
    debug!(
        "symbol pass: {} tables, {} rows matched, {} lines skipped, {} unique symbols",
        tables,
        matched,
        skipped,
        symbols.len()
    );
    symbols
}

/// `[ 1] .vectors  PROGBITS  00000000 010000 0007d0 ...`
/// Address, offset and size are hexadecimal. Trailing fields are ignored.
fn match_section_row(line: &str) -> Option<SectionRecord> {
    let mut row = RowScanner::new(line);
    row.skip_whitespace();
    row.literal('[')?;
    row.run(|c| c.is_ascii_digit() || c == ' ')?;
    row.literal(']')?;
    row.whitespace()?;
    let name = row.run(is_section_name_char)?;
    row.whitespace()?;
    let kind = row.run(|c| c.is_ascii_alphabetic() || c == '_')?;
    row.whitespace()?;
    let address = row.run(is_hex_digit)?;
    row.whitespace()?;
    let file_offset = row.run(is_hex_digit)?;
    row.whitespace()?;
    let size = row.run(is_hex_digit)?;

    Some(SectionRecord {
        name: name.to_string(),
        kind: kind.to_string(),
        address: u64::from_str_radix(address, 16).ok()?,
        file_offset: u64::from_str_radix(file_offset, 16).ok()?,
        size: u64::from_str_radix(size, 16).ok()?,
    })
}

/// `   613: 3ed02e00    56 FUNC    GLOBAL DEFAULT    2 xTaskGetSchedulerState`
/// Address is hexadecimal, size is decimal. The name is the longest run of
/// word characters and dots, so `printf@GLIBC_2.2.5` is keyed as `printf`.
fn match_symbol_row(line: &str) -> Option<SymbolRecord> {
    let mut row = RowScanner::new(line);
    row.whitespace()?;
    row.run(|c| c.is_ascii_digit())?;
    row.literal(':')?;
    row.whitespace()?;
    let address = row.run(is_hex_digit)?;
    row.whitespace()?;
    let size = row.run(|c| c.is_ascii_digit())?;
    // Type, bind, visibility.
    for _ in 0..3 {
        row.whitespace()?;
        row.run(is_word_char)?;
    }
    row.whitespace()?;
    row.run(|c| c.is_ascii_digit())?;
    row.whitespace()?;
    let name = row.run(|c| is_word_char(c) || c == '.')?;

    Some(SymbolRecord {
        name: name.to_string(),
        address: u64::from_str_radix(address, 16).ok()?,
        size: size.parse().ok()?,
    })
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_section_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Left-to-right matcher over one line. Every step either consumes input and
/// returns `Some`, or returns `None` and the caller gives up on the row.
struct RowScanner<'a> {
    rest: &'a str,
}

impl<'a> RowScanner<'a> {
    fn new(line: &'a str) -> Self {
        RowScanner { rest: line }
    }

    /// Consumes any amount of whitespace, returning how many bytes were eaten.
    fn skip_whitespace(&mut self) -> usize {
        let trimmed = self.rest.trim_start();
        let eaten = self.rest.len() - trimmed.len();
        self.rest = trimmed;
        eaten
    }

    /// Requires at least one whitespace character.
    fn whitespace(&mut self) -> Option<()> {
        (self.skip_whitespace() > 0).then_some(())
    }

    fn literal(&mut self, expected: char) -> Option<()> {
        self.rest = self.rest.strip_prefix(expected)?;
        Some(())
    }

    /// Consumes the longest non-empty prefix whose characters all satisfy `accept`.
    fn run(&mut self, accept: impl Fn(char) -> bool) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !accept(c))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(run)
    }
}
