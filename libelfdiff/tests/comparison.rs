use std::collections::HashMap;
use std::path::{Path, PathBuf};
/////////////////////////////////////////
use libelfdiff::{ChangeKind, Comparison, DumpError, TableDumper};
/////////////////////////////////////////

const FIRMWARE_OLD: &str = include_str!("data/firmware_old.txt");
const FIRMWARE_NEW: &str = include_str!("data/firmware_new.txt");

/// Serves canned dumps; anything else is an unreadable input.
struct CannedDumper {
    dumps: HashMap<PathBuf, &'static str>,
}

impl CannedDumper {
    fn new(dumps: &[(&str, &'static str)]) -> Self {
        CannedDumper {
            dumps: dumps
                .iter()
                .map(|(path, text)| (PathBuf::from(path), *text))
                .collect(),
        }
    }
}

impl TableDumper for CannedDumper {
    fn dump(&self, binary: &Path) -> Result<String, DumpError> {
        self.dumps
            .get(binary)
            .map(|text| text.to_string())
            .ok_or_else(|| DumpError::UnreadableInput {
                path: binary.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

#[test]
fn test_firmware_section_changes() {
    let comparison = Comparison::from_dumps(FIRMWARE_OLD, FIRMWARE_NEW);
    let changes = comparison.section_changes();
    let summary: Vec<(&str, u64, u64, i128, ChangeKind)> = changes
        .values()
        .map(|c| (c.name.as_str(), c.old_size, c.new_size, c.diff, c.kind))
        .collect();
    let expected: [(&str, u64, u64, i128, ChangeKind); 4] = [
        (".text", 0x4af0, 0x4c20, 0x130, ChangeKind::Resized),
        (".bss", 0x230, 0x200, -0x30, ChangeKind::Resized),
        (".symtab", 0x27d0, 0x27e0, 0x10, ChangeKind::Resized),
        (".init_array", 0, 4, 4, ChangeKind::Added),
    ];
    assert_eq!(summary, expected);
}

#[test]
fn test_firmware_symbol_changes() {
    let comparison = Comparison::from_dumps(FIRMWARE_OLD, FIRMWARE_NEW);
    let changes = comparison.symbol_changes();
    let summary: Vec<(&str, i128, ChangeKind)> = changes
        .values()
        .map(|c| (c.name.as_str(), c.diff, c.kind))
        .collect();
    let expected: [(&str, i128, ChangeKind); 3] = [
        ("xTaskGetSchedulerState", 8, ChangeKind::Resized),
        ("FIQInterrupt", -20, ChangeKind::Removed),
        ("vApplicationIdleHook", 120, ChangeKind::Added),
    ];
    assert_eq!(summary, expected);
}

#[test]
fn test_changes_matches_individual_computations() {
    let comparison = Comparison::from_dumps(FIRMWARE_OLD, FIRMWARE_NEW);
    let (symbols, sections) = comparison.changes();
    assert_eq!(symbols, comparison.symbol_changes());
    assert_eq!(sections, comparison.section_changes());
}

#[test]
fn test_same_dump_has_no_changes() {
    let comparison = Comparison::from_dumps(FIRMWARE_NEW, FIRMWARE_NEW);
    let (symbols, sections) = comparison.changes();
    assert!(symbols.is_empty());
    assert!(sections.is_empty());
}

#[test]
fn test_dumps_without_tables() {
    let comparison = Comparison::from_dumps("readelf: Error: Not an ELF file", "");
    assert!(comparison.old_snapshot().is_empty());
    assert!(comparison.new_snapshot().is_empty());
    assert!(comparison.symbol_changes().is_empty());
    assert!(comparison.largest_symbols(5).is_empty());
}

#[test]
fn test_largest_symbols() {
    let comparison = Comparison::from_dumps(FIRMWARE_OLD, FIRMWARE_NEW);
    let largest: Vec<(&str, u64)> = comparison
        .largest_symbols(4)
        .iter()
        .map(|s| (s.name.as_str(), s.size))
        .collect();
    let expected: [(&str, u64); 4] = [
        ("_ctype_", 257),
        ("vApplicationIdleHook", 120),
        ("strlen", 92),
        ("xTaskGetSchedulerState", 64),
    ];
    assert_eq!(largest, expected);
    // Ties are broken by name.
    let all = comparison.largest_symbols(100);
    assert_eq!(all.len(), 6);
    assert_eq!(all[4].name, "_exit");
    assert_eq!(all[5].name, "ulPortInterruptNesting");
}

#[test]
fn test_from_binaries() {
    let dumper = CannedDumper::new(&[("old.elf", FIRMWARE_OLD), ("new.elf", FIRMWARE_NEW)]);
    let comparison =
        Comparison::from_binaries(&dumper, Path::new("old.elf"), Path::new("new.elf"))
            .expect("both dumps are available");
    assert_eq!(comparison.symbol_changes().len(), 3);
    assert_eq!(comparison.section_changes().len(), 4);
}

#[test]
fn test_from_binaries_missing_new_binary_is_fatal() {
    let dumper = CannedDumper::new(&[("old.elf", FIRMWARE_OLD)]);
    let result =
        Comparison::from_binaries(&dumper, Path::new("old.elf"), Path::new("missing.elf"));
    let error = result.expect_err("missing binary must fail");
    let message = format!("{:#}", error);
    assert!(message.contains("new binary missing.elf"), "{}", message);
    assert!(error.downcast_ref::<DumpError>().is_some());
}

#[test]
fn test_from_binaries_missing_old_binary_is_fatal() {
    let dumper = CannedDumper::new(&[("new.elf", FIRMWARE_NEW)]);
    let result =
        Comparison::from_binaries(&dumper, Path::new("gone.elf"), Path::new("new.elf"));
    assert!(result.is_err());
}
