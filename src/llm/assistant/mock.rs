//! Scripted in-memory [`AssistantClient`] for tests.
//!
//! Run statuses are consumed in order by `retrieve_run`; once the script is exhausted the
//! last status repeats. Every call is recorded for verification.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{ Arc, Mutex };

use super::{
    AssistantApiError,
    AssistantClient,
    MessageContent,
    Run,
    RunStatus,
    TextContent,
    Thread,
    ThreadMessage,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateThread,
    AddMessage { thread_id: String, content: String },
    CreateRun { thread_id: String, assistant_id: String },
    RetrieveRun { run_id: String },
    LatestMessage { thread_id: String },
}

#[derive(Debug, Clone)]
pub struct MockAssistantClient {
    initial_status: RunStatus,
    statuses: Arc<Mutex<VecDeque<RunStatus>>>,
    reply: Option<ThreadMessage>,
    fail_thread_creation: bool,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Default for MockAssistantClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssistantClient {
    pub fn new() -> Self {
        Self {
            initial_status: RunStatus::Queued,
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            reply: None,
            fail_thread_creation: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run is reported `completed` as soon as it is created.
    pub fn completing_immediately() -> Self {
        Self { initial_status: RunStatus::Completed, ..Self::new() }
    }

    pub fn with_statuses(self, statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        self.statuses.lock().unwrap().extend(statuses);
        self
    }

    pub fn with_reply(mut self, message: ThreadMessage) -> Self {
        self.reply = Some(message);
        self
    }

    pub fn with_text_reply(self, value: &str, citations: usize) -> Self {
        let annotations = (0..citations)
            .map(|i| serde_json::json!({ "type": "file_citation", "text": format!("【{}†source】", i) }))
            .collect();
        self.with_reply(ThreadMessage {
            id: "msg_reply".into(),
            role: "assistant".into(),
            content: vec![MessageContent::Text {
                text: TextContent { value: value.into(), annotations },
            }],
        })
    }

    pub fn failing_thread_creation(mut self) -> Self {
        self.fail_thread_creation = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::RetrieveRun { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AssistantClient for MockAssistantClient {
    async fn create_thread(&self) -> Result<Thread, AssistantApiError> {
        self.record(Call::CreateThread);
        if self.fail_thread_creation {
            return Err(AssistantApiError::Api { status: 500, message: "thread store offline".into() });
        }
        Ok(Thread { id: "thread_mock".into() })
    }

    async fn add_message(
        &self,
        thread_id: &str,
        content: &str
    ) -> Result<ThreadMessage, AssistantApiError> {
        self.record(Call::AddMessage { thread_id: thread_id.into(), content: content.into() });
        Ok(ThreadMessage { id: "msg_user".into(), role: "user".into(), content: Vec::new() })
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantApiError> {
        self.record(Call::CreateRun { thread_id: thread_id.into(), assistant_id: assistant_id.into() });
        Ok(Run { id: "run_mock".into(), status: self.initial_status, last_error: None })
    }

    async fn retrieve_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, AssistantApiError> {
        self.record(Call::RetrieveRun { run_id: run_id.into() });
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap_or(self.initial_status)
        } else {
            statuses.front().copied().unwrap_or(self.initial_status)
        };
        Ok(Run { id: run_id.into(), status, last_error: None })
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<ThreadMessage>, AssistantApiError> {
        self.record(Call::LatestMessage { thread_id: thread_id.into() });
        Ok(self.reply.clone())
    }
}
