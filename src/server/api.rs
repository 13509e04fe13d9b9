use crate::agent::AssistantAgent;
use crate::error::ChatError;
use crate::models::chat::{ ChatRequest, ChatResponse };
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ rejection::JsonRejection, State },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

const SERVICE_NAME: &str = "TRIBOI AI API";
const BACKEND_NAME: &str = "TRIBOI AI Backend";
const AVAILABLE_ENDPOINTS: [&str; 3] = ["/", "/api/health", "/api/chat"];

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<AssistantAgent>,
}

#[derive(Serialize)]
struct Banner {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct HealthReport {
    pub status: &'static str,
    pub openai_configured: bool,
    pub openai_client: &'static str,
    pub assistant_id_set: bool,
    pub vector_store_id_set: bool,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    detail: String,
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ChatError::Configuration(_)
            | ChatError::UpstreamRunFailed(_)
            | ChatError::EmptyReply
            | ChatError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.kind(),
            detail: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub fn router(agent: Arc<AssistantAgent>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .fallback(not_found_handler)
        .with_state(AppState { agent })
}

async fn root_handler() -> impl IntoResponse {
    Json(Banner {
        status: "online",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: BTreeMap::from([
            ("health", "/api/health"),
            ("chat", "/api/chat (POST)"),
        ]),
    })
}

pub fn health_report(agent: &AssistantAgent) -> HealthReport {
    let settings = agent.settings();
    let healthy = settings.api_key_configured && agent.client_ready();
    HealthReport {
        status: if healthy { "healthy" } else { "degraded" },
        openai_configured: settings.api_key_configured,
        openai_client: if agent.client_ready() { "initialized" } else { "failed" },
        assistant_id_set: settings.assistant_id.is_some(),
        vector_store_id_set: settings.vector_store_id.is_some(),
        service: BACKEND_NAME,
        version: env!("CARGO_PKG_VERSION"),
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(health_report(&state.agent))
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(req)) => state.agent.chat(&req).await.map(Json::<ChatResponse>).into_response(),
        Err(rejection) => invalid_request(rejection),
    }
}

fn invalid_request(rejection: JsonRejection) -> Response {
    let body = ErrorBody {
        success: false,
        error: "invalid_request",
        detail: rejection.body_text(),
    };
    (rejection.status(), Json(body)).into_response()
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "available_endpoints": AVAILABLE_ENDPOINTS,
        })),
    )
}
