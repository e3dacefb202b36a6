// HTTP request handlers
use crate::application::config_repository::ConfigError;
use crate::domain::catalog::{Config, Dashboard};
use crate::domain::theme;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub token: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_version() -> impl IntoResponse {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

/// Current configuration document; 503 until a load has succeeded.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Response {
    match state.config_store.snapshot() {
        Some(config) => Json((*config).clone()).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "configuration not loaded",
                "detail": state.config_store.last_error(),
            })),
        )
            .into_response(),
    }
}

/// Re-fetches the document from the persistence backend. A failure keeps
/// the stale copy in place and reports the error.
pub async fn reload_config(State(state): State<Arc<AppState>>) -> Response {
    match state.config_store.load().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => config_error_response(e),
    }
}

/// Full-document replace (authenticated only).
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(new_config): Json<Config>,
) -> Response {
    if !state.session.is_authenticated() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.config_store.update(new_config).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => config_error_response(e),
    }
}

/// Dashboard summaries in display order.
pub async fn list_dashboards(State(state): State<Arc<AppState>>) -> Response {
    let Some(config) = state.config_store.snapshot() else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    let summaries: Vec<_> = config
        .sorted_dashboards()
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "name": d.name,
                "path": d.path,
                "order": d.order,
            })
        })
        .collect();
    Json(summaries).into_response()
}

/// Looks a dashboard up by route path segment or id; the subtree comes back
/// in display order.
pub async fn get_dashboard(
    Path(path_or_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.config_store.find_dashboard(&path_or_id) {
        Some(mut dashboard) => {
            dashboard.sort_for_display();
            Json(dashboard).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Single-dashboard replace (authenticated only).
pub async fn update_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(dashboard): Json<Dashboard>,
) -> Response {
    if !state.session.is_authenticated() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if dashboard.id != id {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "dashboard id does not match path" })),
        )
            .into_response();
    }

    match state.config_store.update_dashboard(dashboard).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => config_error_response(e),
    }
}

/// Synchronous status cache read; never triggers a probe.
pub async fn get_status(
    Path(entry_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.scheduler.read(&entry_id) {
        Some(tuple) => Json(tuple).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Registers interest in an entry's status on behalf of an HTTP client.
/// The returned watch id must be released when the entry leaves the
/// client's visible set.
pub async fn watch_entry(
    Path(entry_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let handle = state.scheduler.subscribe(&entry_id);
    let watch_id = state.next_watch_id.fetch_add(1, Ordering::SeqCst);
    let response = json!({ "watchId": watch_id, "entryId": handle.entry_id() });
    state.watches.lock().unwrap().insert(watch_id, handle);
    Json(response)
}

pub async fn release_watch(
    Path(watch_id): Path<u64>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let handle = state.watches.lock().unwrap().remove(&watch_id);
    match handle {
        Some(handle) => {
            state.scheduler.release(handle);
            StatusCode::NO_CONTENT.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Effective theme for an entry. Collects the ancestor ThemeLevel chain
/// (dashboard -> tab -> group -> entry) and resolves it, including the
/// concrete text color when a textColor mode is set.
pub async fn get_entry_theme(
    Path((dashboard_id, tab_id, group_id, entry_id)): Path<(String, String, String, String)>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(config) = state.config_store.snapshot() else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    let Some(dashboard) = config.find_dashboard(&dashboard_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(tab) = dashboard.find_tab(&tab_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(group) = tab.find_group(&group_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(entry) = group.find_entry(&entry_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let resolved = theme::effective_entry_theme(
        dashboard.theme.as_ref(),
        tab.theme.as_ref(),
        group.theme.as_ref(),
        entry.theme.as_ref(),
    );
    let text_color_value = resolved
        .text_color
        .map(|mode| theme::text_color_value(mode, resolved.color.as_deref()));

    Json(json!({
        "theme": resolved,
        "textColorValue": text_color_value,
    }))
    .into_response()
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    if request.token == state.admin_token {
        state.session.set_authenticated(true);
        Json(json!({ "authenticated": true })).into_response()
    } else {
        tracing::warn!("login rejected: invalid admin token");
        StatusCode::UNAUTHORIZED.into_response()
    }
}

pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // Also drops edit mode, synchronously.
    state.session.set_authenticated(false);
    StatusCode::NO_CONTENT
}

pub async fn session_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "authenticated": state.session.is_authenticated(),
        "editMode": state.session.is_edit_mode(),
    }))
}

/// Entering edit mode is an expected-failure operation: the response is
/// always 200 with the resulting flag.
pub async fn enable_edit_mode(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "editMode": state.session.try_enable_edit_mode() }))
}

pub async fn disable_edit_mode(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.session.disable_edit_mode();
    Json(json!({ "editMode": false }))
}

fn config_error_response(error: ConfigError) -> Response {
    let status = match &error {
        ConfigError::Load(_) | ConfigError::Persist(_) => StatusCode::BAD_GATEWAY,
        ConfigError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        ConfigError::DashboardNotFound(_) => StatusCode::NOT_FOUND,
        ConfigError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
