//! MCP tools over the live topic namespace.
//!
//! Three read-only tools backed by the shared [`TopicStore`]: list the
//! root-level topics, list the subtopics of a path, and read a topic's
//! last known value. Negative outcomes (unknown topic, no direct value)
//! are ordinary tool results, never protocol faults.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use topic_tree::{RootListing, StoreError, TopicStore, ValueOutcome};

/// Topic MCP Service
#[derive(Clone)]
pub struct TopicService {
    /// Shared namespace store, fed by the ingest pipeline
    store: TopicStore,
    /// Tool router
    tool_router: ToolRouter<Self>,
}

impl TopicService {
    pub fn new(store: TopicStore) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_handler]
impl ServerHandler for TopicService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Topic MCP exposes the live MQTT topic namespace. Use 'list_topics' to see the top-level topics discovered so far, 'list_subtopics' to drill into a topic path, and 'read_topic_value' to read a topic's last known value.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Tool Input Schemas
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListSubtopicsRequest {
    /// Topic path to inspect
    #[schemars(description = "The full topic path (e.g., 'V/home/kitchen')")]
    pub topic_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadTopicValueRequest {
    /// Topic path to read
    #[schemars(description = "The full topic path (e.g., 'V/home/temp')")]
    pub topic_path: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl TopicService {
    #[tool(
        description = "List all known top-level topics currently discovered under the subscribed root. Topics that carry their own value are flagged."
    )]
    pub async fn list_topics(&self) -> Result<CallToolResult, McpError> {
        match self.store.list_root() {
            RootListing::Empty => Ok(CallToolResult::success(vec![Content::text(
                "No topics discovered yet. Waiting for messages...",
            )])),
            RootListing::Topics(entries) => {
                let mut lines = vec!["Known topics under root:".to_string()];
                for entry in entries {
                    let marker = if entry.has_value { " (has value)" } else { "" };
                    lines.push(format!("- {}{marker}", entry.name));
                }
                Ok(CallToolResult::success(vec![Content::text(
                    lines.join("\n"),
                )]))
            }
        }
    }

    #[tool(description = "List subtopics for a given topic path.")]
    pub async fn list_subtopics(
        &self,
        Parameters(request): Parameters<ListSubtopicsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let path = request.topic_path.as_str();
        match self.store.list_subtopics(path) {
            Err(StoreError::NotFound(_)) | Err(StoreError::MalformedPath) => {
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Topic '{path}' not found in known topics."
                ))]))
            }
            Ok(entries) if entries.is_empty() => Ok(CallToolResult::success(vec![Content::text(
                format!("No subtopics found for '{path}'."),
            )])),
            Ok(entries) => {
                let mut lines = vec![format!("Subtopics for '{path}':")];
                for entry in entries {
                    lines.push(format!("- {}", entry.name));
                }
                Ok(CallToolResult::success(vec![Content::text(
                    lines.join("\n"),
                )]))
            }
        }
    }

    #[tool(description = "Read the last known value of a specific topic.")]
    pub async fn read_topic_value(
        &self,
        Parameters(request): Parameters<ReadTopicValueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let path = request.topic_path.as_str();
        match self.store.read_value(path) {
            ValueOutcome::Found(value) => Ok(CallToolResult::success(vec![Content::text(
                format!("Value for '{path}': {value}"),
            )])),
            ValueOutcome::NoValue => Ok(CallToolResult::success(vec![Content::text(format!(
                "Topic '{path}' exists but has no direct value recorded (might be a parent topic)."
            ))])),
            ValueOutcome::NotFound => Ok(CallToolResult::error(vec![Content::text(format!(
                "Topic '{path}' has not been seen."
            ))])),
        }
    }
}
