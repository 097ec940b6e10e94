// ABOUTME: HTTP server assembly: merges domain routers and applies the shared middleware stack
// ABOUTME: Request ids, per-request tracing spans and CORS wrap every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use http::HeaderName;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::middleware::{make_request_span, setup_cors, MakeRequestUuid, REQUEST_ID_HEADER};
use crate::resources::ServerResources;
use crate::routes::files::MULTIPART_OVERHEAD_BYTES;
use crate::routes::{ChatRoutes, FileRoutes, GmailRoutes, HealthRoutes, SessionRoutes};

/// Every route with the middleware stack applied
///
/// No request body may exceed the upload limit plus multipart overhead.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let cors = setup_cors(&resources.config.cors);
    let body_limit = resources.files.max_file_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(ChatRoutes::routes(Arc::clone(&resources)))
        .merge(FileRoutes::routes(Arc::clone(&resources)))
        .merge(GmailRoutes::routes(Arc::clone(&resources)))
        .merge(SessionRoutes::routes(resources))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
}

/// Bind `0.0.0.0:port` and serve until Ctrl-C
///
/// # Errors
///
/// Returns an internal error if the port cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>, port: u16) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Ridhi server listening");

    axum::serve(listener, build_router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
    }
}
