//! Topic MCP Server
//!
//! Subscribes to an MQTT broker, maintains an in-memory index of the topic
//! namespace with the last known value per topic, and exposes it to AI
//! agents via MCP.
//!
//! ## Tools
//!
//! - `list_topics` - top-level topics discovered under the subscribed root
//! - `list_subtopics` - subtopics of a given topic path
//! - `read_topic_value` - last known value of a specific topic
//!
//! ## Configuration
//!
//! - `MQTT_BROKER_URL` (default `test.mosquitto.org`)
//! - `MQTT_BROKER_PORT` (default `1883`)
//! - `MQTT_TOPIC_ROOT` (default `V/#`)
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "topic-mcp": {
//!       "command": "topic-mcp"
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use topic_ingest::{spawn_ingest, IngestConfig};
use topic_tree::TopicStore;

mod tools;

use tools::TopicService;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting Topic MCP server");

    let store = TopicStore::new();
    let config = IngestConfig::from_env();
    let ingest = spawn_ingest(store.clone(), config);

    // Create and start the MCP server
    let service = TopicService::new(store);
    let server = service.serve(stdio()).await?;

    // Wait for shutdown
    server.waiting().await?;
    ingest.shutdown().await;

    log::info!("Topic MCP server stopped");
    Ok(())
}
