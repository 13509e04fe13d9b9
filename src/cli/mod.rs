use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Interface the HTTP server binds to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Comma separated list of origins allowed to call the API from a browser.
    /// A single `*` inside an entry matches any run of characters (e.g. https://*.pages.dev).
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "https://triboiai.online,https://www.triboiai.online,https://*.pages.dev,http://localhost:*"
    )]
    pub allowed_origins: Vec<String>,

    // --- Assistant Provider Args ---
    /// API key for the OpenAI Assistants API.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI REST API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Identifier of the preconfigured assistant every run is bound to (asst_...).
    #[arg(long, env = "ASSISTANT_ID")]
    pub assistant_id: Option<String>,

    /// Identifier of the document store attached to the assistant (vs_...). Reported by the health check only.
    #[arg(long, env = "VECTOR_STORE_ID")]
    pub vector_store_id: Option<String>,

    /// Upper bound on how long a single run may stay queued or in progress (60 to 90 seconds).
    #[arg(
        long,
        env = "RUN_TIMEOUT_SECS",
        default_value = "60",
        value_parser = clap::value_parser!(u64).range(60..=90)
    )]
    pub run_timeout_secs: u64,

    /// Delay between two run status polls.
    #[arg(long, env = "POLL_INTERVAL_MS", default_value = "1000")]
    pub poll_interval_ms: u64,

    /// Timeout applied to each individual HTTP call made to the OpenAI API.
    #[arg(long, env = "OPENAI_REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- Prompt Args ---
    /// Optional JSON file overriding the built-in mode instructions ({"ro": {"vindecare": "..."}}).
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,
}

impl Args {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn api_key(&self) -> Option<&str> {
        non_empty(&self.openai_api_key)
    }

    pub fn assistant_id(&self) -> Option<&str> {
        non_empty(&self.assistant_id)
    }

    pub fn vector_store_id(&self) -> Option<&str> {
        non_empty(&self.vector_store_id)
    }
}

// Deployment platforms frequently export variables that are set but blank.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
