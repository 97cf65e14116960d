use std::path::Path;
/////////////////////////////////////////
use anyhow::{Context, Result};
use log::info;
/////////////////////////////////////////
use crate::changes::{ChangeMap, compute_changes};
use crate::extract::extract_snapshot;
use crate::readelf::TableDumper;
use crate::records::{Snapshot, SymbolRecord};
/////////////////////////////////////////

/// Old and new snapshots of one comparison run.
#[derive(Debug, Clone)]
pub struct Comparison {
    old: Snapshot,
    new: Snapshot,
}

impl Comparison {
    pub fn new(old: Snapshot, new: Snapshot) -> Self {
        Comparison { old, new }
    }

    /// Extracts both dumps concurrently. Never fails.
    pub fn from_dumps(old_dump: &str, new_dump: &str) -> Self {
        let (old, new) = std::thread::scope(|scope| {
            let old = scope.spawn(|| extract_snapshot(old_dump));
            let new = extract_snapshot(new_dump);
            (join(old), new)
        });
        Comparison { old, new }
    }

    /// Dumps both binaries with `dumper`, then extracts. Either dump failing is
    /// fatal; there is no partial analysis.
    pub fn from_binaries<D: TableDumper>(
        dumper: &D,
        old_binary: &Path,
        new_binary: &Path,
    ) -> Result<Self> {
        let old_dump = dumper
            .dump(old_binary)
            .with_context(|| format!("Failed to dump old binary {}", old_binary.display()))?;
        let new_dump = dumper
            .dump(new_binary)
            .with_context(|| format!("Failed to dump new binary {}", new_binary.display()))?;
        let comparison = Self::from_dumps(&old_dump, &new_dump);
        info!(
            "old: {} sections, {} symbols; new: {} sections, {} symbols",
            comparison.old.sections().len(),
            comparison.old.symbols().len(),
            comparison.new.sections().len(),
            comparison.new.symbols().len()
        );
        Ok(comparison)
    }

    pub fn old_snapshot(&self) -> &Snapshot {
        &self.old
    }

    pub fn new_snapshot(&self) -> &Snapshot {
        &self.new
    }

    pub fn section_changes(&self) -> ChangeMap {
        compute_changes(self.old.sections(), self.new.sections())
    }

    pub fn symbol_changes(&self) -> ChangeMap {
        compute_changes(self.old.symbols(), self.new.symbols())
    }

    /// Returns `(symbol_changes, section_changes)`, computed side by side.
    pub fn changes(&self) -> (ChangeMap, ChangeMap) {
        std::thread::scope(|scope| {
            let symbols = scope.spawn(|| self.symbol_changes());
            let sections = self.section_changes();
            (join(symbols), sections)
        })
    }

    /// The `count` largest symbols of the new binary, biggest first, ties by name.
    pub fn largest_symbols(&self, count: usize) -> Vec<&SymbolRecord> {
        let mut symbols: Vec<&SymbolRecord> = self.new.symbols().values().collect();
        symbols.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
        symbols.truncate(count);
        symbols
    }
}

fn join<T>(handle: std::thread::ScopedJoinHandle<'_, T>) -> T {
    // Extraction and diffing do not panic on any input; re-raise if they ever do.
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}
