// ABOUTME: Server binary for the Ridhi student assistant API
// ABOUTME: Loads .env and environment configuration, wires resources and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

#![recursion_limit = "256"]

//! # Ridhi Server Binary
//!
//! Starts the HTTP API. Every setting comes from the environment; a `.env`
//! file in the working directory is loaded first when present.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use ridhi_server::{config::ServerConfig, logging, resources::ServerResources, server};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ridhi-server")]
#[command(about = "Ridhi student assistant API - dual-LLM chat, weekly history, files and Gmail")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let dotenv = dotenvy::dotenv();
    logging::init_from_env()?;
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Ridhi server");
    info!("{}", config.summary());

    let port = config.http_port;
    let resources = Arc::new(ServerResources::from_config(config)?);
    display_available_endpoints(port);

    if let Err(e) = server::run(resources, port).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }
    Ok(())
}

fn display_available_endpoints(port: u16) {
    let base = format!("http://localhost:{port}");
    info!("=== Available Endpoints ===");
    info!("Health:   GET  {base}/health");
    info!("Chat:     POST {base}/api/chat/message");
    info!("History:  GET  {base}/api/chat/history/:userId");
    info!("Weeks:    GET  {base}/api/chat/weeks/:userId");
    info!("Upload:   POST {base}/api/files/upload");
    info!("Files:    GET  {base}/api/files/list/:userId");
    info!("Query:    POST {base}/api/files/query");
    info!("Gmail:    GET  {base}/api/gmail/auth-url");
    info!("Sessions: POST {base}/save-keys, GET {base}/keys, POST {base}/verify-token");
    info!("=== End of Endpoint List ===");
}
