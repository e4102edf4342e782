//! Error types for the load balancer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::path::PathBuf;
use thiserror::Error;

/// Message sent to clients when the chosen worker cannot be reached.
pub const UNAVAILABLE_MESSAGE: &str = "Server is temporarily unavailable. Please try again later.";

/// Fatal errors raised before the proxy accepts traffic.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("At least {min} worker ports are required in APP_SERVER_PORTS (found {found})")]
    TooFewWorkers { found: usize, min: usize },

    #[error("Invalid worker port: {0:?}")]
    InvalidPort(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("TLS material not found: {}. Set CERT_PATH and KEY_PATH", path.display())]
    MissingTlsMaterial { path: PathBuf },

    #[error("Failed to load TLS configuration: {0}")]
    Tls(#[source] std::io::Error),

    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Per-request failures. Never fatal to the process.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Upstream {worker} failed: {source}")]
    Upstream {
        worker: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("Cannot address upstream {worker}: {reason}")]
    BadTarget { worker: String, reason: String },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": UNAVAILABLE_MESSAGE })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[tokio::test]
    async fn test_proxy_error_renders_bad_gateway_json() {
        let err = ProxyError::BadTarget {
            worker: "app-1".to_string(),
            reason: "bad uri".to_string(),
        };
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": UNAVAILABLE_MESSAGE }));
    }

    #[test]
    fn test_startup_error_messages() {
        let err = StartupError::TooFewWorkers { found: 1, min: 2 };
        assert!(err.to_string().contains("found 1"));

        let err = StartupError::MissingTlsMaterial {
            path: PathBuf::from("/nope/server.crt"),
        };
        assert!(err.to_string().contains("/nope/server.crt"));
    }
}
