use std::path::Path;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::api::{self, ApiState};
use crate::config::ServerConfig;
use crate::search::CheaperNearbyService;

/// Assemble the full application: API routes, root handler, CORS, logging and limits.
pub fn app(config: &ServerConfig, service: CheaperNearbyService) -> Result<Router> {
    let state = ApiState {
        service,
        expose_errors: !config.is_production(),
    };

    let mut app = Router::new().nest("/api", api::router(state));

    app = if config.is_production() {
        // client-side routing: unknown paths get the app shell with 200
        let index = Path::new(&config.static_dir).join("index.html");
        app.fallback_service(ServeDir::new(&config.static_dir).fallback(ServeFile::new(index)))
    } else {
        app.route("/", get(|| async { "API Running..." }))
    };

    Ok(app
        .layer(cors_layer(&config.allowed_origins)?)
        // enforced by the extractor, so oversized bodies get the API envelope
        .layer(DefaultBodyLimit::max(config.body_limit_kb as usize * 1024))
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::AUTHORIZATION])
        .allow_credentials(true))
}

pub async fn run(config: &ServerConfig, service: CheaperNearbyService) -> Result<()> {
    let app = app(config, service)?;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        "Server running in {:?} mode at http://{}",
        config.environment,
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
