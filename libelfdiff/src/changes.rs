use std::fmt::Display;

use indexmap::IndexMap;

use crate::records::{RecordMap, SizedEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Removed,
    Resized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub name: String,
    /// 0 when the entity is new.
    pub old_size: u64,
    /// 0 when the entity was removed.
    pub new_size: u64,
    /// `new_size - old_size`, exact for any pair of u64 sizes.
    pub diff: i128,
    pub kind: ChangeKind,
}

/// Sparse diff keyed by name. Unchanged entities have no entry.
pub type ChangeMap = IndexMap<String, ChangeRecord>;

impl ChangeRecord {
    fn new(name: &str, old_size: u64, new_size: u64, kind: ChangeKind) -> Self {
        ChangeRecord {
            name: name.to_string(),
            old_size,
            new_size,
            diff: i128::from(new_size) - i128::from(old_size),
            kind,
        }
    }
}

/// Compares two name-keyed tables by size. Names only in `old` are removed,
/// names only in `new` are added, names in both with different sizes are
/// resized. Name is the only identity: a rename shows up as removed + added.
///
/// Entries come out in `old` order followed by the added names in `new` order.
pub fn compute_changes<T: SizedEntity>(old: &RecordMap<T>, new: &RecordMap<T>) -> ChangeMap {
    let mut changes = ChangeMap::new();
    for (name, old_entity) in old {
        let old_size = old_entity.size();
        match new.get(name) {
            Some(new_entity) if new_entity.size() != old_size => {
                changes.insert(
                    name.clone(),
                    ChangeRecord::new(name, old_size, new_entity.size(), ChangeKind::Resized),
                );
            }
            Some(_) => {}
            None => {
                changes.insert(
                    name.clone(),
                    ChangeRecord::new(name, old_size, 0, ChangeKind::Removed),
                );
            }
        }
    }
    for (name, new_entity) in new {
        if !old.contains_key(name) {
            changes.insert(
                name.clone(),
                ChangeRecord::new(name, 0, new_entity.size(), ChangeKind::Added),
            );
        }
    }
    changes
}

/// Net size change over all entries.
pub fn total_diff(changes: &ChangeMap) -> i128 {
    changes.values().map(|change| change.diff).sum()
}

pub fn count_by_kind(changes: &ChangeMap, kind: ChangeKind) -> usize {
    changes.values().filter(|change| change.kind == kind).count()
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Resized => "resize",
        };
        // `pad` so that width/alignment flags from the report apply.
        f.pad(label)
    }
}
