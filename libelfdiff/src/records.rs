use indexmap::IndexMap;

/// Name-keyed, insertion-ordered table. Re-inserting a name replaces the
/// value but keeps the position of its first appearance.
pub type RecordMap<T> = IndexMap<String, T>;

/// Anything the change computer can compare: it only cares about size.
pub trait SizedEntity {
    fn size(&self) -> u64;
}

/// One row of the "Section Headers" table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    pub name: String,
    /// PROGBITS, NOBITS, NULL, ... kept verbatim, never interpreted.
    pub kind: String,
    pub address: u64,
    pub file_offset: u64,
    pub size: u64,
}

/// One row of a "Symbol table" block. Type/bind/visibility/ndx are matched
/// but dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub name: String,
    pub address: u64,
    pub size: u64,
}

impl SizedEntity for SectionRecord {
    fn size(&self) -> u64 {
        self.size
    }
}

impl SizedEntity for SymbolRecord {
    fn size(&self) -> u64 {
        self.size
    }
}

/// Tables extracted from one binary. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    sections: RecordMap<SectionRecord>,
    symbols: RecordMap<SymbolRecord>,
}

impl Snapshot {
    pub fn new(sections: RecordMap<SectionRecord>, symbols: RecordMap<SymbolRecord>) -> Self {
        Snapshot { sections, symbols }
    }

    pub fn sections(&self) -> &RecordMap<SectionRecord> {
        &self.sections
    }

    pub fn symbols(&self) -> &RecordMap<SymbolRecord> {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.symbols.is_empty()
    }
}
