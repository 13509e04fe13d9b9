pub mod openai;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::LlmConfig;
use self::openai::OpenAIAssistantClient;

#[derive(Debug, Error)]
pub enum AssistantApiError {
    #[error("Invalid assistant client configuration: {0}")]
    InvalidConfig(String),
    #[error("HTTP error talking to the assistant API: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Assistant API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Lifecycle states reported by the remote service for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Still waiting on the remote side; keep polling.
    pub fn is_pending(&self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: TextContent,
    },
    /// Image files, refusals and any block type added later.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}

/// Remote thread/run API. One handle is shared by every request; each call is independent.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    async fn create_thread(&self) -> Result<Thread, AssistantApiError>;

    async fn add_message(
        &self,
        thread_id: &str,
        content: &str
    ) -> Result<ThreadMessage, AssistantApiError>;

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantApiError>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantApiError>;

    /// Most recent message in the thread, if any.
    async fn latest_message(&self, thread_id: &str) -> Result<Option<ThreadMessage>, AssistantApiError>;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn AssistantClient>, AssistantApiError> {
    let client = OpenAIAssistantClient::from_config(config)?;
    Ok(Arc::new(client))
}
