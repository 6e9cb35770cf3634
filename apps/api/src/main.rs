mod config;
mod errors;
mod extract;
mod interview;
mod llm_client;
mod prompts;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::services::InterviewServices;
use crate::interview::session::SessionStore;
use crate::llm_client::LlmClient;
use crate::prompts::PromptStore;
use crate::routes::build_router;
use crate::state::AppState;

/// How often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentScout API v{}", env!("CARGO_PKG_VERSION"));

    // Prompt templates are required; a missing or malformed file stops startup.
    let prompts = PromptStore::load(&config.prompts_path).with_context(|| {
        format!("failed to load prompts from {}", config.prompts_path.display())
    })?;
    info!("Prompt store loaded from {}", config.prompts_path.display());

    // Initialize LLM client
    let llm = LlmClient::new(config.groq_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let services = InterviewServices::new(Arc::new(llm), Arc::new(prompts));

    let sessions = SessionStore::new(config.session_idle_timeout);
    sessions.spawn_sweeper(SWEEP_INTERVAL);
    info!(
        "Session store ready (idle timeout: {}s)",
        config.session_idle_timeout.as_secs()
    );

    let state = AppState { services, sessions };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
