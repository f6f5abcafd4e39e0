//! Operator dashboard: a static page behind an optional HTTP Basic gate.
//!
//! This boundary is stateless and has no interaction with the ticket
//! engine; it exists so operators have a place to check the bot's setup
//! notes without touching the community itself.

pub mod auth;
mod assets;

use std::sync::Arc;

use {
    anyhow::{Context as _, Result},
    axum::{Router, middleware, response::Redirect, routing::get},
    tower_http::trace::TraceLayer,
    tracing::{info, warn},
};

use helpdesk_config::{DashboardConfig, DashboardCredentials};

/// Build the dashboard router.
#[must_use]
pub fn router(credentials: Option<Arc<DashboardCredentials>>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/dashboard", get(assets::index))
        .route("/assets/{*path}", get(assets::serve_asset))
        .layer(middleware::from_fn_with_state(
            credentials,
            auth::require_basic_auth,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Serve the dashboard until the process exits.
pub async fn serve(config: DashboardConfig) -> Result<()> {
    let credentials = config.credentials.clone().map(Arc::new);
    if credentials.is_none() {
        warn!("dashboard authentication not configured, serving unauthenticated");
    }

    let app = router(credentials);
    let listener = tokio::net::TcpListener::bind((config.bind.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind dashboard to {}:{}", config.bind, config.port))?;
    info!(bind = %config.bind, port = config.port, "dashboard listening");
    axum::serve(listener, app)
        .await
        .context("dashboard server stopped")?;
    Ok(())
}
