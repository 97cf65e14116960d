//! Size diff between two builds of an ELF binary, driven by the textual
//! section and symbol tables `readelf -a` prints.
//!
//! The flow is: dump text (see [`readelf`]) -> [`extract::extract_snapshot`]
//! per binary -> [`changes::compute_changes`] per table -> [`report::Table`].

pub mod changes;
pub mod comparison;
pub mod extract;
pub mod readelf;
pub mod records;
pub mod report;

// Export the types most callers need as is
pub use changes::{ChangeKind, ChangeMap, ChangeRecord, compute_changes};
pub use comparison::Comparison;
pub use extract::extract_snapshot;
pub use readelf::{DumpError, Readelf, TableDumper};
pub use records::{RecordMap, SectionRecord, SizedEntity, Snapshot, SymbolRecord};
pub use report::Table;
