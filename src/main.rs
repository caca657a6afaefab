mod api;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod routes;
mod services;
mod workflow;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::jira::JiraClient;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env()?;
    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_base_url.clone(),
        &config.jira_email,
        &config.jira_token,
    ));
    let context = AppContext::new(config.clone(), issue_tracker);
    let app = routes::build_router(context);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        "ticket-bridge v{} listening on {}, forwarding to {} (project {})",
        env!("CARGO_PKG_VERSION"),
        listener.local_addr()?,
        config.jira_base_url,
        config.jira_project_key
    );

    axum::serve(listener, app).await?;
    Ok(())
}
