use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, Response, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ de::DeserializeOwned, Deserialize, Serialize };
use url::Url;

use super::{ AssistantApiError, AssistantClient, Run, Thread, ThreadMessage };
use crate::llm::LlmConfig;

const BETA_HEADER: &str = "openai-beta";
const BETA_VALUE: &str = "assistants=v2";

/// Assistants API v2 over plain REST.
pub struct OpenAIAssistantClient {
    http: HttpClient,
    base_url: Url,
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAIAssistantClient {
    pub fn new(
        api_key: &str,
        base_url: &str,
        request_timeout: std::time::Duration
    ) -> Result<Self, AssistantApiError> {
        let base_url = Url::parse(base_url).map_err(|e|
            AssistantApiError::InvalidConfig(format!("Invalid base URL '{}': {}", base_url, e))
        )?;
        if base_url.cannot_be_a_base() {
            return Err(
                AssistantApiError::InvalidConfig(format!("Base URL '{}' cannot carry a path", base_url))
            );
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(BETA_HEADER, HeaderValue::from_static(BETA_VALUE));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
            AssistantApiError::InvalidConfig(format!("Invalid API key format: {}", e))
        )?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, AssistantApiError> {
        let api_key = config.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AssistantApiError::InvalidConfig("OpenAI API key is required".to_string()))?;

        Self::new(api_key, &config.base_url, config.request_timeout)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, AssistantApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(AssistantApiError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        })
    }
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl AssistantClient for OpenAIAssistantClient {
    async fn create_thread(&self) -> Result<Thread, AssistantApiError> {
        let url = self.endpoint(&["threads"]);
        let resp = self.http.post(url).json(&serde_json::json!({})).send().await?;
        Self::decode(resp).await
    }

    async fn add_message(
        &self,
        thread_id: &str,
        content: &str
    ) -> Result<ThreadMessage, AssistantApiError> {
        let url = self.endpoint(&["threads", thread_id, "messages"]);
        let req = CreateMessageRequest { role: "user", content };
        let resp = self.http.post(url).json(&req).send().await?;
        Self::decode(resp).await
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantApiError> {
        let url = self.endpoint(&["threads", thread_id, "runs"]);
        let resp = self.http.post(url).json(&CreateRunRequest { assistant_id }).send().await?;
        Self::decode(resp).await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantApiError> {
        let url = self.endpoint(&["threads", thread_id, "runs", run_id]);
        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<ThreadMessage>, AssistantApiError> {
        let url = self.endpoint(&["threads", thread_id, "messages"]);
        let resp = self.http
            .get(url)
            .query(&[("order", "desc"), ("limit", "1")])
            .send().await?;
        let list: MessageList = Self::decode(resp).await?;
        debug!("Fetched {} message(s) from thread {}", list.data.len(), thread_id);
        Ok(list.data.into_iter().next())
    }
}
