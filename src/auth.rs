//! Request authentication middleware.
//!
//! Two gates guard the user directory:
//!
//! - **Bearer gate** - extracts `Authorization: Bearer <token>`, verifies the
//!   HS256 signature, and attaches the caller's [`AuthIdentity`] to the
//!   request for downstream handlers. A missing header is reported
//!   separately from a bad token so clients can distinguish "log in first"
//!   from "your token is broken".
//! - **Admin gate** - compares the `x-admin-token` header against the
//!   configured admin secret in constant time. Layered on top of the bearer
//!   gate for the directory-listing routes.
//!
//! The gates are deliberately independent: the admin gate never inspects the
//! bearer identity, and the bearer gate grants the same access to every
//! signed token regardless of which user it names.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::config::ADMIN_TOKEN_HEADER;
use crate::error::AppError;
use crate::observability::SecurityEvent;
use crate::security_event;
use crate::state::AppState;

// ===== Authenticated Identity =====

/// Identity extracted from a verified bearer token.
///
/// Inserted into request extensions by [`require_bearer`]; handlers that sit
/// behind the bearer gate can rely on it being present.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    /// Username named by the token's claims.
    pub username: String,
    /// Whether the token carries the special-access marker.
    pub special_access: bool,
}

// ===== Bearer Gate =====

/// Middleware requiring a valid bearer token.
///
/// Responses:
/// - no `Authorization: Bearer` header → 401 `Token not provided`
/// - header present but token fails verification → 403 `Token not valid`
/// - valid token → [`AuthIdentity`] attached, request continues
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or_else(|| {
        security_event!(
            SecurityEvent::AuthenticationFailure,
            reason = "missing bearer token",
            path = request.uri().path()
        );
        AppError::unauthenticated("Token not provided")
    })?;

    let claims = state.tokens.verify(&token).map_err(|err| {
        security_event!(
            SecurityEvent::AuthenticationFailure,
            reason = "bearer token rejected",
            detail = %err,
            path = request.uri().path()
        );
        AppError::invalid_token("Token not valid")
    })?;

    let identity = AuthIdentity {
        username: claims.username,
        special_access: claims.special_access.unwrap_or(false),
    };
    security_event!(
        SecurityEvent::AuthenticationSuccess,
        username = identity.username.as_str()
    );
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Pulls the token out of `Authorization: Bearer <token>`.
///
/// The scheme match is case-insensitive per RFC 7235. A header with a
/// different scheme (or no scheme at all) counts as absent, which the
/// caller reports as 401 rather than 403.
fn bearer_token(request: &Request) -> Option<String> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

// ===== Admin Gate =====

/// Middleware requiring the static admin token in `x-admin-token`.
///
/// The comparison uses [`ConstantTimeEq`] so response timing does not leak
/// how much of the token an attacker has guessed. Absent and mismatched
/// headers both yield 403 `Requires admin token`.
pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if !constant_time_eq(presented, &state.admin_token) {
        security_event!(
            SecurityEvent::AccessDenied,
            reason = "admin token mismatch",
            path = request.uri().path()
        );
        return Err(AppError::forbidden("Requires admin token"));
    }

    Ok(next.run(request).await)
}

/// Constant-time string equality.
///
/// `ct_eq` on the byte slices short-circuits on length, so an attacker can
/// still learn the token's length. That is acceptable here; the content is
/// what must not leak.
fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    fn request_with_auth(value: &str) -> Request {
        HttpRequest::builder()
            .uri("/users/me")
            .header(AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn extracts_bearer_token() {
        let request = request_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&request).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let request = request_with_auth("bearer abc.def.ghi");
        assert_eq!(bearer_token(&request).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let request = request_with_auth("Basic dXNlcjpwYXNz");
        assert!(bearer_token(&request).is_none());
    }

    #[test]
    fn rejects_empty_token() {
        let request = request_with_auth("Bearer ");
        assert!(bearer_token(&request).is_none());
    }

    #[test]
    fn missing_header_yields_none() {
        let request = HttpRequest::builder()
            .uri("/users/me")
            .body(Body::empty())
            .unwrap();
        assert!(bearer_token(&request).is_none());
    }

    #[test]
    fn constant_time_eq_matches_equal_strings() {
        assert!(constant_time_eq("ADMIN_TOKEN", "ADMIN_TOKEN"));
        assert!(!constant_time_eq("ADMIN_TOKEN", "admin_token"));
        assert!(!constant_time_eq("", "ADMIN_TOKEN"));
    }
}
