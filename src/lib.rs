pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod reply;
pub mod server;
pub mod validation;

use agent::AssistantAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr());
    info!("OpenAI Base URL: {}", args.openai_base_url);
    info!("OpenAI API Key Set: {}", args.api_key().is_some());
    info!("Assistant ID Set: {}", args.assistant_id().is_some());
    info!("Vector Store ID Set: {}", args.vector_store_id().is_some());
    info!("Allowed Origins: {}", args.allowed_origins.join(", "));
    info!("Run Timeout: {}s (poll every {}ms)", args.run_timeout_secs, args.poll_interval_ms);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("-------------------------");

    let agent = Arc::new(AssistantAgent::from_args(&args)?);
    let addr = args.server_addr();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
