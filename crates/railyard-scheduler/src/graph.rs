//! Registry of declared entries.

use railyard_core::entry::{Entry, EntryKind};
use railyard_core::{EntryId, Error, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Declared entries in insertion order, unique per (kind, id).
#[derive(Debug, Default)]
pub struct EntryGraph {
    entries: Vec<Arc<Entry>>,
    index: HashMap<(EntryKind, EntryId), usize>,
}

impl EntryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry, validating its runner targets.
    pub fn register(&mut self, entry: Entry) -> Result<()> {
        let key = (entry.kind, entry.id.clone());
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateEntry {
                kind: entry.kind,
                id: entry.id.to_string(),
            });
        }

        if entry.runner_targets.is_empty() {
            return Err(invalid_entry(&entry, "no runner targets"));
        }
        let mut seen = BTreeSet::new();
        if let Some(dup) = entry.runner_targets.iter().find(|os| !seen.insert(**os)) {
            return Err(invalid_entry(&entry, &format!("runner target {} listed twice", dup)));
        }

        self.index.insert(key, self.entries.len());
        self.entries.push(Arc::new(entry));
        Ok(())
    }

    /// Entries of one kind, in declaration order.
    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &Arc<Entry>> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn find(&self, kind: EntryKind, id: &str) -> Option<&Arc<Entry>> {
        self.index
            .get(&(kind, EntryId::new(id)))
            .map(|&idx| &self.entries[idx])
    }

    /// All entries, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<Entry>> for EntryGraph {
    type Error = Error;

    fn try_from(entries: Vec<Entry>) -> Result<Self> {
        let mut graph = EntryGraph::new();
        for entry in entries {
            graph.register(entry)?;
        }
        Ok(graph)
    }
}

fn invalid_entry(entry: &Entry, reason: &str) -> Error {
    Error::InvalidEntry {
        kind: entry.kind,
        id: entry.id.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railyard_core::runner::RunnerOs;
    use railyard_core::trigger::TriggerFlags;

    fn entry(kind: EntryKind, id: &str) -> Entry {
        Entry::new(kind, id, id)
            .accepts(TriggerFlags::COMMIT)
            .runs_on([RunnerOs::UbuntuLatest])
    }

    #[test]
    fn test_register_and_find() {
        let mut graph = EntryGraph::new();
        graph.register(entry(EntryKind::Test, "t1")).unwrap();
        graph.register(entry(EntryKind::Build, "b1")).unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.find(EntryKind::Test, "t1").is_some());
        assert!(graph.find(EntryKind::Build, "t1").is_none());
        assert_eq!(graph.entries_of(EntryKind::Build).count(), 1);
    }

    #[test]
    fn test_same_id_allowed_across_kinds() {
        let mut graph = EntryGraph::new();
        graph.register(entry(EntryKind::Build, "core")).unwrap();
        graph.register(entry(EntryKind::Publish, "core")).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut graph = EntryGraph::new();
        graph.register(entry(EntryKind::Test, "t1")).unwrap();
        let err = graph.register(entry(EntryKind::Test, "t1")).unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { kind: EntryKind::Test, .. }));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_runner_targets_validated() {
        let mut graph = EntryGraph::new();
        let no_targets = Entry::test("t1", "t1").accepts(TriggerFlags::COMMIT);
        assert!(matches!(
            graph.register(no_targets),
            Err(Error::InvalidEntry { .. })
        ));

        let twice = entry(EntryKind::Test, "t2").runs_on([RunnerOs::UbuntuLatest]);
        assert!(graph.register(twice).is_err());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let graph = EntryGraph::try_from(vec![
            entry(EntryKind::Publish, "p1"),
            entry(EntryKind::Test, "t1"),
            entry(EntryKind::Build, "b1"),
        ])
        .unwrap();
        let ids: Vec<_> = graph.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "t1", "b1"]);
    }
}
