//! # Topic Ingest
//!
//! MQTT transport adapter: owns the broker connection, subscribes to the
//! configured root pattern, and feeds decoded `(topic, payload)` updates
//! into a [`topic_tree::TopicStore`] through a single writer task.
//!
//! Connection failures are the adapter's problem alone: the event loop
//! reconnects with a fixed backoff and re-subscribes, and nothing of it
//! reaches the store or its readers.

mod adapter;
mod config;

pub use adapter::{spawn_ingest, IngestHandle, TopicUpdate};
pub use config::IngestConfig;
