//! Request audit middleware.
//!
//! Wraps every request in a span carrying a correlation ID, the client IP,
//! and the route, then logs completion with status and latency. Responses
//! that indicate an auth problem (401, 403) or a server fault (5xx) get an
//! extra security event so the audit trail records denials even when they
//! were produced deep inside a handler.

use std::time::Instant;

use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use tracing::{error, info};

use crate::observability::SecurityEvent;
use crate::security_event;

/// Audit layer applied outside the auth gates, so denials are logged with
/// the request context that produced them.
pub async fn audit_middleware(request: Request, next: Next) -> Response {
    let correlation_id = correlation_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = client_ip(&request);

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
        client_ip = %client_ip,
    );
    let _guard = span.enter();

    let start = Instant::now();
    let response = next.run(request).await;
    let latency = start.elapsed();
    let status = response.status();

    log_outcome(status, &path, &client_ip, latency);

    info!(
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "Request completed"
    );

    response
}

/// Emits security events for response statuses that signal a denial or a
/// fault. Successful auth outcomes are logged at the handler level where
/// the username is known, so only failures are inferred from status here.
fn log_outcome(status: StatusCode, path: &str, client_ip: &str, latency: std::time::Duration) {
    match status {
        StatusCode::UNAUTHORIZED => {
            security_event!(
                SecurityEvent::AuthenticationFailure,
                ip_address = client_ip,
                path = path
            );
        }
        StatusCode::FORBIDDEN => {
            security_event!(
                SecurityEvent::AccessDenied,
                ip_address = client_ip,
                path = path
            );
        }
        status if status.is_server_error() => {
            error!(
                status = %status.as_u16(),
                ip_address = %client_ip,
                path = %path,
                latency_ms = %latency.as_millis(),
                "Server error occurred"
            );
        }
        _ => {}
    }
}

/// Uses the caller's `x-correlation-id` or `x-request-id` when present so
/// IDs survive proxy hops; otherwise mints one from the clock.
fn correlation_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-correlation-id")
        .or_else(|| request.headers().get("x-request-id"))
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(generate_request_id)
}

fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("req-{:x}", timestamp)
}

/// Best-effort client IP from proxy headers, checked in priority order:
/// `x-forwarded-for` (first hop), `x-real-ip`, then `cf-connecting-ip`.
fn client_ip(request: &Request<Body>) -> String {
    let headers = request.headers();

    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = xff.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    for header in ["x-real-ip", "cf-connecting-ip"] {
        if let Some(ip) = headers.get(header).and_then(|v| v.to_str().ok()) {
            return ip.to_string();
        }
    }

    "unknown".to_string()
}
