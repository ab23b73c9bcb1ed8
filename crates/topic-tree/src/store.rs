use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, StoreError};
use crate::path::split_topic;
use crate::tree::{ChildEntry, TopicTree};

/// Outcome of a point lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueOutcome {
    /// The topic has a directly recorded value.
    Found(String),
    /// The topic exists as a namespace prefix but never received a value.
    NoValue,
    /// No node resolves at the path.
    NotFound,
}

/// Root-level listing, distinguishing a never-fed store from one whose
/// root merely has the children it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootListing {
    /// No update has ever been ingested.
    Empty,
    /// Root-level topic names, sorted, each flagged with `has_value`.
    Topics(Vec<ChildEntry>),
}

/// Shared handle over the namespace tree and its value index.
///
/// Cloneable; all clones address the same store. One writer (the ingest
/// pipeline) mutates through [`TopicStore::ingest`]; any number of readers
/// query concurrently. The write lock spans the combined tree-upsert plus
/// index-set step, so no reader can observe the two disagreeing about a
/// path's value state.
#[derive(Debug, Clone, Default)]
pub struct TopicStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    tree: TopicTree,
    // Full topic string -> latest payload. Kept in lock-step with the tree;
    // never mutated outside the ingest critical section.
    values: HashMap<String, String>,
}

impl TopicStore {
    pub fn new() -> Self {
        Self::default()
    }

    // No operation panics while holding the lock, so a poisoned guard can
    // only carry a fully applied state; recover rather than propagate.
    fn read_inner(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one `(topic, payload)` update. Sole write entry point.
    ///
    /// The payload is decoded as UTF-8 with lossy replacement; undecodable
    /// bytes never reject an update. A topic that splits into zero segments
    /// is rejected as [`StoreError::MalformedPath`] without touching the
    /// store; callers log and move on.
    pub fn ingest(&self, raw_topic: &str, payload: &[u8]) -> Result<()> {
        let segments = split_topic(raw_topic);
        if segments.is_empty() {
            return Err(StoreError::MalformedPath);
        }
        let text = String::from_utf8_lossy(payload).into_owned();
        let full_path = segments.join("/");

        let mut inner = self.write_inner();
        inner.tree.upsert(&segments, text.clone());
        inner.values.insert(full_path, text);
        Ok(())
    }

    /// Root-level topics, or [`RootListing::Empty`] if nothing has ever
    /// been ingested.
    pub fn list_root(&self) -> RootListing {
        let inner = self.read_inner();
        if inner.tree.is_empty() {
            return RootListing::Empty;
        }
        let entries = inner
            .tree
            .list_children(&[])
            .unwrap_or_default();
        RootListing::Topics(entries)
    }

    /// Immediate children of the node at `path`, sorted by name.
    ///
    /// `Ok(vec![])` means the node exists but is childless (a leaf holding
    /// only a value), a normal state distinct from `NotFound`.
    pub fn list_subtopics(&self, path: &str) -> Result<Vec<ChildEntry>> {
        let segments = split_topic(path);
        let inner = self.read_inner();
        inner
            .tree
            .list_children(&segments)
            .map_err(|_| StoreError::NotFound(path.to_owned()))
    }

    /// Point lookup of a topic's last known value.
    ///
    /// The value itself comes from the flat index (O(1)); the tree is only
    /// consulted to tell a known prefix apart from a never-seen path.
    pub fn read_value(&self, path: &str) -> ValueOutcome {
        let segments = split_topic(path);
        let inner = self.read_inner();
        let full_path = segments.join("/");
        if let Some(value) = inner.values.get(&full_path) {
            return ValueOutcome::Found(value.clone());
        }
        if inner.tree.node(&segments).is_some() {
            ValueOutcome::NoValue
        } else {
            ValueOutcome::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn last_write_wins_in_value_index() {
        let store = TopicStore::new();
        store.ingest("V/a", b"1").unwrap();
        store.ingest("V/b", b"2").unwrap();
        store.ingest("V/a", b"3").unwrap();

        assert_eq!(store.read_value("V/a"), ValueOutcome::Found("3".into()));
        assert_eq!(store.read_value("V/b"), ValueOutcome::Found("2".into()));
    }

    #[test]
    fn kitchen_scenario() {
        let store = TopicStore::new();
        store.ingest("V/home/kitchen/temp", b"21.5").unwrap();
        store.ingest("V/home/kitchen/humidity", b"40").unwrap();

        let subtopics = store.list_subtopics("V/home/kitchen").unwrap();
        let names: Vec<&str> = subtopics.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["humidity", "temp"]);

        assert_eq!(store.read_value("V/home/kitchen"), ValueOutcome::NoValue);
        assert_eq!(
            store.read_value("V/home/kitchen/temp"),
            ValueOutcome::Found("21.5".into())
        );
    }

    #[test]
    fn empty_store_reports_empty_not_error() {
        let store = TopicStore::new();
        assert_eq!(store.list_root(), RootListing::Empty);
    }

    #[test]
    fn prefix_and_unseen_paths() {
        let store = TopicStore::new();
        store.ingest("V/a/b", b"x").unwrap();

        assert_eq!(store.read_value("V/a"), ValueOutcome::NoValue);
        assert_eq!(store.read_value("V/a/b/c"), ValueOutcome::NotFound);
    }

    #[test]
    fn subtopics_not_found_iff_node_absent() {
        let store = TopicStore::new();
        store.ingest("V/a/b", b"x").unwrap();

        assert_eq!(
            store.list_subtopics("V/missing"),
            Err(StoreError::NotFound("V/missing".into()))
        );
        // Existing leaf: empty list, not NotFound.
        assert_eq!(store.list_subtopics("V/a/b"), Ok(vec![]));
    }

    #[test]
    fn malformed_topics_are_rejected_without_mutation() {
        let store = TopicStore::new();
        assert_eq!(store.ingest("", b"x"), Err(StoreError::MalformedPath));
        assert_eq!(store.ingest("///", b"x"), Err(StoreError::MalformedPath));
        assert_eq!(store.list_root(), RootListing::Empty);
    }

    #[test]
    fn undecodable_payload_is_applied_lossily() {
        let store = TopicStore::new();
        store.ingest("V/bin", &[0x66, 0xff, 0x6f]).unwrap();

        match store.read_value("V/bin") {
            ValueOutcome::Found(text) => {
                assert!(text.contains('\u{FFFD}'), "expected replacement char in {text:?}");
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn delimiter_noise_normalizes_to_same_path() {
        let store = TopicStore::new();
        store.ingest("V//a/", b"x").unwrap();
        assert_eq!(store.read_value("V/a"), ValueOutcome::Found("x".into()));
    }

    #[test]
    fn ingest_is_idempotent() {
        let store = TopicStore::new();
        store.ingest("V/a", b"x").unwrap();
        store.ingest("V/a", b"x").unwrap();

        assert_eq!(store.read_value("V/a"), ValueOutcome::Found("x".into()));
        match store.list_root() {
            RootListing::Topics(entries) => assert_eq!(entries.len(), 1),
            RootListing::Empty => panic!("store should not be empty"),
        }
    }

    #[test]
    fn index_and_tree_agree_on_has_value() {
        let store = TopicStore::new();
        store.ingest("V/home/kitchen/temp", b"21.5").unwrap();

        for path in ["V", "V/home", "V/home/kitchen"] {
            assert_eq!(store.read_value(path), ValueOutcome::NoValue, "{path}");
        }
        assert!(matches!(
            store.read_value("V/home/kitchen/temp"),
            ValueOutcome::Found(_)
        ));
    }

    #[test]
    fn concurrent_readers_see_consistent_state() {
        let store = TopicStore::new();
        store.ingest("stable/topic", b"fixed").unwrap();

        let writer_store = store.clone();
        let writer = std::thread::spawn(move || {
            for i in 0..1000 {
                writer_store
                    .ingest(&format!("churn/{}", i % 10), format!("{i}").as_bytes())
                    .unwrap();
            }
        });

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let reader_store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        // An unrelated write stream never perturbs this value.
                        assert_eq!(
                            reader_store.read_value("stable/topic"),
                            ValueOutcome::Found("fixed".into())
                        );
                        // Every churn topic that resolves must have a value:
                        // no torn node-without-value state is observable.
                        for i in 0..10 {
                            match reader_store.read_value(&format!("churn/{i}")) {
                                ValueOutcome::Found(_) | ValueOutcome::NotFound => {}
                                ValueOutcome::NoValue => {
                                    panic!("observed churn/{i} materialized without its value")
                                }
                            }
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
