//! HTTP handlers for the default worker application
//!
//! The real application surface lives behind the workers and is opaque to the
//! proxy. These handlers give each worker a health probe and a JSON 404 so the
//! pool is useful on its own.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthBody<'a> {
    status: &'static str,
    server_id: &'a str,
}

/// Health check endpoint
pub async fn health(State(server_id): State<Arc<str>>) -> impl IntoResponse {
    Json(HealthBody {
        status: "ok",
        server_id: &server_id,
    })
    .into_response()
}

/// Fallback for unknown routes
pub async fn not_found(State(server_id): State<Arc<str>>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Route not found.",
            "serverId": &*server_id,
        })),
    )
}
