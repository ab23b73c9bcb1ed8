use std::collections::BTreeMap;

use crate::error::{Result, StoreError};

/// One node of the namespace tree: a topic prefix or full topic.
///
/// A node can be a pure intermediate (no value), a leaf with a value, or
/// both a parent and a value carrier at once: `sensors` keeps its own
/// payload even after `sensors/temp` materializes a child under it.
#[derive(Debug, Clone, Default)]
pub struct TopicNode {
    children: BTreeMap<String, TopicNode>,
    value: Option<String>,
}

impl TopicNode {
    /// Last payload recorded directly at this node, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether an update ever targeted exactly this node's path.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Immediate children as `(name, has_value)` pairs, sorted by name.
    pub fn child_entries(&self) -> Vec<ChildEntry> {
        self.children
            .iter()
            .map(|(name, node)| ChildEntry {
                name: name.clone(),
                has_value: node.has_value(),
            })
            .collect()
    }

    pub fn child(&self, name: &str) -> Option<&TopicNode> {
        self.children.get(name)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// An immediate child of a node, flagged with whether it carries its own value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub name: String,
    pub has_value: bool,
}

/// Namespace tree rooted at a sentinel node with an empty path.
///
/// For every topic ever upserted, a chain of nodes exists from the root to
/// that exact path; intermediate segments are materialized even if no update
/// ever targeted them directly. Nodes are never removed.
#[derive(Debug, Clone, Default)]
pub struct TopicTree {
    root: TopicNode,
}

impl TopicTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first successful upsert.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Walk from the root creating missing intermediates, then record
    /// `value` on the terminal node. Re-upserting an existing path is an
    /// overwrite, not an error.
    ///
    /// Precondition: `segments` is non-empty; callers reject malformed
    /// paths before reaching the tree.
    pub fn upsert(&mut self, segments: &[String], value: String) {
        debug_assert!(!segments.is_empty(), "upsert requires at least one segment");
        let mut current = &mut self.root;
        for segment in segments {
            current = current.children.entry(segment.clone()).or_default();
        }
        current.value = Some(value);
    }

    /// Read-only traversal. `None` if any segment along the path is absent;
    /// never materializes nodes.
    pub fn node(&self, segments: &[String]) -> Option<&TopicNode> {
        let mut current = &self.root;
        for segment in segments {
            current = current.children.get(segment)?;
        }
        Some(current)
    }

    /// Immediate children of the node at `segments`, sorted by name.
    ///
    /// An empty `segments` slice addresses the root. A node that exists but
    /// has no children yields `Ok(vec![])`, distinct from `NotFound`.
    pub fn list_children(&self, segments: &[String]) -> Result<Vec<ChildEntry>> {
        self.node(segments)
            .map(TopicNode::child_entries)
            .ok_or_else(|| StoreError::NotFound(segments.join("/")))
    }
}
