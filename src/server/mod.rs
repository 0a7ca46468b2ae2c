
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::engine::DispatchEngine;
use crate::telegram::{Messenger, Update};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<DispatchEngine>,
    pub messenger: Arc<dyn Messenger>,
    /// Externally reachable base URL, overrides the request headers when set.
    pub public_url: Option<String>
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/setup-webhook", get(setup_webhook))
        .with_state(state)
}

/// Acknowledges every parsable update immediately; handling happens in the dispatch engine.
pub async fn webhook(State(state): State<ServerState>, body: Bytes) -> (StatusCode, &'static str) {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(error) => {
            warn!("Failed to parse update: {error}");
            return (StatusCode::BAD_REQUEST, "Bad Request")
        }
    };

    let update_id = update.update_id;

    match update.into_incoming() {
        Some(message) => {
            state.engine.submit(message);
        },
        None => debug!("Ignoring update [{update_id}] without a text message")
    }

    (StatusCode::OK, "OK")
}

pub async fn setup_webhook(State(state): State<ServerState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let url = format!("{}/webhook", base_url(state.public_url.as_deref(), &headers));

    match state.messenger.set_webhook(&url).await {
        Ok(()) => {
            info!("Webhook registered at {url}");
            (StatusCode::OK, Json(json!({ "message": "Webhook set successfully", "url": url })))
        },
        Err(error) => {
            error!("Failed to register webhook at {url}: {error}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": format!("Failed to set webhook: {error}") })))
        }
    }
}

fn base_url(public_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = public_url {
        return url.trim_end_matches('/').to_string()
    }

    let scheme = header_value(headers, "x-forwarded-proto")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .unwrap_or("https");
    let host = header_value(headers, "x-forwarded-host")
        .or_else(|| header_value(headers, "host"))
        .unwrap_or("localhost");

    format!("{scheme}://{host}")
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
