use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::llm::assistant::{ AssistantApiError, RunStatus };
use crate::validation::ValidationError;

/// How a run ended when it did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedRun {
    /// Terminal status reported by the remote service.
    Remote(RunStatus),
    /// Still queued or in progress when the local wait bound elapsed.
    TimedOut { waited: Duration, last: RunStatus },
}

impl fmt::Display for FailedRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedRun::Remote(status) => write!(f, "{}", status),
            FailedRun::TimedOut { waited, last } =>
                write!(f, "timed_out after {}s (last status: {})", waited.as_secs(), last),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("OpenAI service unavailable. Check API key configuration.")]
    UpstreamUnavailable,
    #[error("Assistant run failed: {0}")]
    UpstreamRunFailed(FailedRun),
    #[error("Empty response from assistant")]
    EmptyReply,
    #[error("Error processing request: {0}")]
    Upstream(#[from] AssistantApiError),
}

impl ChatError {
    /// Stable machine-readable name used in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Configuration(_) => "configuration_error",
            ChatError::Validation(ValidationError::TooShort) => "query_too_short",
            ChatError::Validation(ValidationError::TooLong) => "query_too_long",
            ChatError::UpstreamUnavailable => "upstream_unavailable",
            ChatError::UpstreamRunFailed(FailedRun::TimedOut { .. }) => "upstream_timeout",
            ChatError::UpstreamRunFailed(FailedRun::Remote(_)) => "upstream_run_failed",
            ChatError::EmptyReply => "empty_reply",
            ChatError::Upstream(_) => "upstream_error",
        }
    }
}
