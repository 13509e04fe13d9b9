use crate::cli::Args;
use crate::config::prompt::{ self, PromptError, PromptRegistry };
use crate::error::{ ChatError, FailedRun };
use crate::llm::LlmConfig;
use crate::llm::assistant::{ new_client, AssistantClient, Run, RunStatus, ThreadMessage };
use crate::models::chat::{ ChatRequest, ChatResponse, MODEL_TAG };
use crate::reply::extract_reply;
use crate::validation::validate;

use log::{ debug, error, info, warn };
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{ sleep, Instant };
use uuid::Uuid;

pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub assistant_id: Option<String>,
    pub vector_store_id: Option<String>,
    pub api_key_configured: bool,
    pub run_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            assistant_id: None,
            vector_store_id: None,
            api_key_configured: false,
            run_timeout: DEFAULT_RUN_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Drives one remote thread per chat request. Cheap to clone; the client handle and prompt
/// registry are shared read-only.
#[derive(Clone)]
pub struct AssistantAgent {
    client: Option<Arc<dyn AssistantClient>>,
    prompts: Arc<PromptRegistry>,
    settings: AgentSettings,
}

impl AssistantAgent {
    pub fn new(
        client: Option<Arc<dyn AssistantClient>>,
        prompts: Arc<PromptRegistry>,
        settings: AgentSettings
    ) -> Self {
        Self { client, prompts, settings }
    }

    /// A missing or unusable API key leaves the agent without a client instead of failing,
    /// so the health endpoint can report the problem. A bad prompts file is fatal.
    pub fn from_args(args: &Args) -> Result<Self, PromptError> {
        let prompts = match &args.prompts_path {
            Some(path) if !path.trim().is_empty() => prompt::load_prompts(path)?,
            _ => Arc::new(PromptRegistry::builtin()),
        };

        let config = LlmConfig {
            api_key: args.api_key().map(str::to_string),
            base_url: args.openai_base_url.clone(),
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        };
        let client = match new_client(&config) {
            Ok(client) => {
                info!("OpenAI client initialized: BaseURL={}", config.base_url);
                Some(client)
            }
            Err(e) => {
                error!("OpenAI client init error: {}", e);
                None
            }
        };

        if args.assistant_id().is_none() {
            warn!("ASSISTANT_ID is not set; chat requests will fail until it is configured");
        }

        let settings = AgentSettings {
            assistant_id: args.assistant_id().map(str::to_string),
            vector_store_id: args.vector_store_id().map(str::to_string),
            api_key_configured: args.api_key().is_some(),
            run_timeout: Duration::from_secs(args.run_timeout_secs),
            poll_interval: Duration::from_millis(args.poll_interval_ms),
        };

        Ok(Self::new(client, prompts, settings))
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn client_ready(&self) -> bool {
        self.client.is_some()
    }

    /// Full request lifecycle: validate, compose, run remotely, extract.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let request_id = Uuid::new_v4();

        if self.client.is_none() {
            error!("[{}] OpenAI client not initialized", request_id);
            return Err(ChatError::UpstreamUnavailable);
        }

        let validated = validate(&request.query, &request.mode, &request.lang)?;
        info!(
            "[{}] Processing Assistant request: mode={}, lang={}, query_length={}",
            request_id,
            validated.mode,
            validated.lang,
            validated.query.chars().count()
        );

        let composed = self.prompts.compose(validated.lang, validated.mode, &validated.query);
        let message = self.run(request_id, &composed).await.map_err(|e| {
            error!("[{}] Chat error: {}", request_id, e);
            e
        })?;
        let reply = extract_reply(&message).map_err(|e| {
            error!("[{}] Chat error: {}", request_id, e);
            e
        })?;

        info!(
            "[{}] Response generated: {} characters, sources_used={}",
            request_id,
            reply.text.chars().count(),
            reply.sources_used
        );

        Ok(ChatResponse {
            success: true,
            reply: reply.text,
            mode: validated.mode,
            lang: validated.lang,
            model: MODEL_TAG.to_string(),
            sources_used: reply.sources_used,
        })
    }

    /// Creates a thread, posts `composed`, runs the configured assistant and returns the
    /// thread's most recent message once the run completes. No step is retried.
    pub async fn run(&self, request_id: Uuid, composed: &str) -> Result<ThreadMessage, ChatError> {
        let client = self.client.as_ref().ok_or(ChatError::UpstreamUnavailable)?;
        let assistant_id = self.settings.assistant_id
            .as_deref()
            .ok_or_else(|| ChatError::Configuration("ASSISTANT_ID is not set".to_string()))?;

        let thread = client.create_thread().await?;
        info!("[{}] Thread created: {}", request_id, thread.id);

        let message = client.add_message(&thread.id, composed).await?;
        debug!("[{}] Message added: {}", request_id, message.id);

        let run = client.create_run(&thread.id, assistant_id).await?;
        info!("[{}] Run started: {}", request_id, run.id);

        let run = self.wait_for_run(client.as_ref(), request_id, &thread.id, run).await?;
        if run.status != RunStatus::Completed {
            if let Some(last_error) = &run.last_error {
                error!(
                    "[{}] Run {} ended with {}: {} ({})",
                    request_id,
                    run.id,
                    run.status,
                    last_error.message,
                    last_error.code
                );
            }
            return Err(ChatError::UpstreamRunFailed(FailedRun::Remote(run.status)));
        }

        client.latest_message(&thread.id).await?.ok_or(ChatError::EmptyReply)
    }

    async fn wait_for_run(
        &self,
        client: &dyn AssistantClient,
        request_id: Uuid,
        thread_id: &str,
        mut run: Run
    ) -> Result<Run, ChatError> {
        let started = Instant::now();
        let deadline = started
            .checked_add(self.settings.run_timeout)
            .ok_or_else(||
                ChatError::Configuration(
                    format!("run timeout {:?} is out of range", self.settings.run_timeout)
                )
            )?;

        while run.status.is_pending() {
            let now = Instant::now();
            if now >= deadline {
                let waited = started.elapsed();
                warn!(
                    "[{}] Run {} still {} after {:?}; giving up",
                    request_id,
                    run.id,
                    run.status,
                    waited
                );
                return Err(
                    ChatError::UpstreamRunFailed(FailedRun::TimedOut {
                        waited,
                        last: run.status,
                    })
                );
            }

            // The last sleep is cut short so the wait never exceeds the bound.
            sleep(self.settings.poll_interval.min(deadline - now)).await;
            run = client.retrieve_run(thread_id, &run.id).await?;
            debug!(
                "[{}] Run status: {} ({}s elapsed)",
                request_id,
                run.status,
                started.elapsed().as_secs()
            );
        }

        Ok(run)
    }
}
