//! Request forwarding from the public listener to the selected worker

use crate::balancer::WorkerTarget;
use crate::error::ProxyError;
use crate::state::ProxyState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::HOST, request::Parts, HeaderName, HeaderValue, Uri, Version},
    response::Response,
};
use tracing::{debug, error};

/// Original `host` as seen by the proxy.
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
/// Id of the worker that handled the request, on both the request and response.
pub const X_APP_SERVER_ID: HeaderName = HeaderName::from_static("x-app-server-id");

/// Proxy one inbound request to the next worker in rotation.
///
/// The target is chosen before the first suspension point, so rotation order
/// follows acceptance order no matter how the bodies interleave afterwards.
/// Both bodies are streamed; nothing is buffered here. If the client goes
/// away, this future is dropped and the upstream connection with it.
pub async fn forward(
    State(state): State<ProxyState>,
    request: Request,
) -> Result<Response, ProxyError> {
    let target = state.balancer.next_target();

    let (parts, body) = request.into_parts();
    debug!(worker = %target.id, method = %parts.method, uri = %parts.uri, "Forwarding request");

    let upstream = upstream_request(&target, parts, body)?;

    let response = state.client.request(upstream).await.map_err(|source| {
        error!(worker = %target.id, error = ?source, "Proxy error");
        ProxyError::Upstream {
            worker: target.id.clone(),
            source,
        }
    })?;

    let (mut parts, body) = response.into_parts();
    parts
        .headers
        .insert(X_APP_SERVER_ID, server_id_value(&target)?);

    Ok(Response::from_parts(parts, Body::new(body)))
}

/// Rewrite an inbound request for `target`.
///
/// Method, path, query and all headers are kept. `host` becomes the worker's
/// `host:port`, `x-forwarded-host` carries the inbound host and
/// `x-app-server-id` names the worker.
pub fn upstream_request(
    target: &WorkerTarget,
    parts: Parts,
    body: Body,
) -> Result<Request, ProxyError> {
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let authority = target.authority();

    let uri: Uri = format!("http://{}{}", authority, path_and_query)
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| bad_target(target, e))?;

    // HTTP/2 clients send the host as the :authority pseudo-header
    let inbound_host = parts.headers.get(HOST).cloned().or_else(|| {
        parts
            .uri
            .authority()
            .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
    });

    let mut headers = parts.headers;
    headers.insert(
        HOST,
        HeaderValue::from_str(&authority).map_err(|e| bad_target(target, e))?,
    );
    if let Some(host) = inbound_host {
        headers.insert(X_FORWARDED_HOST, host);
    }
    headers.insert(X_APP_SERVER_ID, server_id_value(target)?);

    let mut upstream = Request::new(body);
    *upstream.method_mut() = parts.method;
    *upstream.uri_mut() = uri;
    *upstream.version_mut() = Version::HTTP_11;
    *upstream.headers_mut() = headers;

    Ok(upstream)
}

fn server_id_value(target: &WorkerTarget) -> Result<HeaderValue, ProxyError> {
    HeaderValue::from_str(&target.id).map_err(|e| bad_target(target, e))
}

fn bad_target(target: &WorkerTarget, reason: impl ToString) -> ProxyError {
    ProxyError::BadTarget {
        worker: target.id.clone(),
        reason: reason.to_string(),
    }
}
