use anyhow::Context;
use race_finder::{Config, RaceServer};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::discover().context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries the MCP protocol
    race_finder::tracing::init(Some(&config.log_level));

    tracing::info!(
        dataset = %config.dataset.display(),
        "Starting race-finder MCP server"
    );

    let server = RaceServer::from_config(&config).await?;

    // Create and serve the MCP server over stdio
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}
