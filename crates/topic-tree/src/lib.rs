//! # Topic Tree
//!
//! In-memory index over a stream of hierarchical topic updates.
//!
//! ## Features
//!
//! - **Namespace tree** - slash-delimited topic hierarchy with per-node last-known value
//! - **Value index** - O(1) point lookup of the latest payload per full topic
//! - **Concurrent queries** - one ingesting writer, many readers, no torn reads
//!
//! ## Architecture
//!
//! ```text
//! (topic, payload)
//!     │
//!     └──> TopicStore::ingest (single writer)
//!            ├─ split topic into segments
//!            ├─ TopicTree::upsert (materialize path, set value)
//!            └─ value index set (same critical section)
//!
//! TopicStore::{list_root, list_subtopics, read_value} (readers)
//!     └─ read lock, consistent snapshot of tree + index
//! ```

mod error;
mod path;
mod store;
mod tree;

pub use error::{Result, StoreError};
pub use path::{split_topic, DELIMITER};
pub use store::{RootListing, TopicStore, ValueOutcome};
pub use tree::{ChildEntry, TopicNode, TopicTree};
