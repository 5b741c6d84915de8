//! Nightingale MCP Server Entry Point
//!
//! Loads `.env`, parses the command line, initializes logging, builds the API
//! client and toolsets, and serves MCP over the configured transport.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use n9e_mcp_server::client::{N9eClient, default_get_client, default_user_agent};
use n9e_mcp_server::core::{Cli, Command, Config, McpServer, TransportService, logging};
use n9e_mcp_server::domains::tools::default_toolset_group;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.command() == Command::Version {
        println!("n9e-mcp-server {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::from_cli(&cli)?;

    let reload = logging::init(&config.logging)?;
    logging::spawn_reload_on_signal(reload)?;

    info!("Starting {} v{}", config.server.name, config.server.version);

    let client = N9eClient::new(
        &config.credentials.token,
        &config.api.base_url,
        &default_user_agent(),
    )?;

    let mut group = default_toolset_group(default_get_client(), config.api.read_only);
    group.check_unique_tools()?;
    if let Err(e) = group.enable_toolsets(config.api.toolsets.as_slice()) {
        error!("Failed to enable toolsets: {}", e);
        return Err(e.into());
    }

    info!(
        base_url = %client.base_url(),
        read_only = config.api.read_only,
        available = ?group.available_toolsets(),
        enabled = ?group.enabled_toolsets(),
        "Toolsets configured"
    );

    let server = McpServer::new(&config, Arc::new(client), &group);
    info!("Server initialized with {} tools", server.tools().len());

    let transport = TransportService::new(config.transport.clone());
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}
