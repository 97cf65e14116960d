///////////////////////////
mod options;
///////////////////////////
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
///////////////////////////
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;
///////////////////////////
use libelfdiff::changes::{ChangeKind, ChangeMap, count_by_kind, total_diff};
use libelfdiff::report::{Table, write_html_document};
use libelfdiff::{Comparison, Readelf};
use options::Options;
///////////////////////////

fn log_summary(what: &str, changes: &ChangeMap) {
    info!(
        "{}: {} added, {} removed, {} resized, net {:+} bytes",
        what,
        count_by_kind(changes, ChangeKind::Added),
        count_by_kind(changes, ChangeKind::Removed),
        count_by_kind(changes, ChangeKind::Resized),
        total_diff(changes)
    );
}

fn build_tables(comparison: &Comparison, largest: Option<usize>) -> Vec<Table> {
    let (symbol_changes, section_changes) = comparison.changes();
    log_summary("symbols", &symbol_changes);
    log_summary("sections", &section_changes);
    let mut tables = vec![
        Table::from_changes("Symbol Changes", &symbol_changes),
        Table::from_changes("Section Changes", &section_changes),
    ];
    if let Some(count) = largest {
        tables.push(Table::from_symbols(
            "Largest Symbols",
            &comparison.largest_symbols(count),
        ));
    }
    tables
}

fn write_html_report(path: &Path, options: &Options, tables: &[Table]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create HTML report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_html_document(
        &mut writer,
        &options.old.display().to_string(),
        &options.new.display().to_string(),
        tables,
    )
    .and_then(|_| writer.flush())
    .with_context(|| format!("Failed to write HTML report {}", path.display()))?;
    info!("HTML report written to {}", path.display());
    Ok(())
}

fn run(options: &Options) -> Result<()> {
    let readelf = Readelf::new(options.prefix.as_str());
    let comparison = Comparison::from_binaries(&readelf, &options.old, &options.new)?;
    let tables = build_tables(&comparison, options.largest);

    let mut stdout = std::io::stdout().lock();
    for table in &tables {
        table
            .write_text(&mut stdout)
            .context("Failed to write text report")?;
    }
    stdout.flush()?;

    if let Some(html_path) = &options.html {
        write_html_report(html_path, options, &tables)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let options = Options::parse();
    if let Err(e) = run(&options) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
