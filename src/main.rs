// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::config_store::ConfigStore;
use crate::application::session::SessionGate;
use crate::application::status_scheduler::StatusScheduler;
use crate::infrastructure::config::load_hub_config;
use crate::infrastructure::config_client::HttpConfigRepository;
use crate::infrastructure::probe_client::HttpProbeClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    disable_edit_mode, enable_edit_mode, get_config, get_dashboard, get_entry_theme, get_status,
    get_version, health_check, list_dashboards, login, logout, release_watch, reload_config,
    session_state, update_config, update_dashboard, watch_entry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let hub_config = load_hub_config()?;

    // Create collaborator clients (infrastructure layer)
    let probe = Arc::new(HttpProbeClient::new(hub_config.status.checker_url.clone())?);
    let repository = Arc::new(HttpConfigRepository::new(
        hub_config.persistence.base_url.clone(),
        hub_config.persistence.token.clone(),
    ));

    // Create services (application layer)
    let config_store = ConfigStore::new(repository);
    if let Err(e) = config_store.load().await {
        // Keep serving; the document stays unavailable until a reload
        // succeeds and the stale-error flag stays readable.
        tracing::warn!("initial configuration load failed: {:#}", e);
    }

    let scheduler = StatusScheduler::new(
        probe,
        Duration::from_millis(hub_config.status.poll_interval_ms),
    );
    let session = SessionGate::new();

    // Create application state
    let state = Arc::new(AppState::new(
        config_store,
        scheduler.clone(),
        session,
        hub_config.auth.admin_token.clone(),
    ));

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/version", get(get_version))
        .route("/api/config", get(get_config).put(update_config))
        .route("/api/config/reload", post(reload_config))
        .route("/api/dashboards", get(list_dashboards))
        .route(
            "/api/dashboards/:path_or_id",
            get(get_dashboard).put(update_dashboard),
        )
        .route("/api/status/:entry_id", get(get_status))
        .route("/api/status/:entry_id/watch", post(watch_entry))
        .route("/api/watches/:watch_id", delete(release_watch))
        .route(
            "/api/theme/:dashboard_id/:tab_id/:group_id/:entry_id",
            get(get_entry_theme),
        )
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/session", get(session_state))
        .route("/api/edit-mode/enable", post(enable_edit_mode))
        .route("/api/edit-mode/disable", post(disable_edit_mode))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = hub_config
        .server
        .bind_addr
        .parse()
        .context("Invalid bind address")?;
    println!("Starting homedeck service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    scheduler.shutdown();
    Ok(())
}
