pub mod api;
pub mod cors;

use crate::agent::AssistantAgent;
use crate::cli::Args;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use log::{ info, warn };

pub struct Server {
    addr: String,
    agent: Arc<AssistantAgent>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, agent: Arc<AssistantAgent>, args: Args) -> Self {
        Self { addr, agent, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;

        let origins = cors::parse_origins(&self.args.allowed_origins);
        if origins.is_empty() {
            warn!("No allowed origins configured; browsers will be refused cross-origin access.");
        }
        let app = api::router(self.agent.clone()).layer(cors::cors_layer(origins));

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e|
            format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
        )?;
        info!("HTTP server listening on: http://{}", addr);

        axum::serve(listener, app.into_make_service()).with_graceful_shutdown(shutdown_signal()).await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
