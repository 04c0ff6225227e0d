//! Request error handling
//!
//! Every failure a handler or gate can produce maps to one of the
//! [`ErrorKind`] variants below, which fix the HTTP status code and the
//! logging severity. All errors are terminal for the request and surface
//! as a JSON body of the form `{"error": "<message>"}`; nothing is
//! retried internally and nothing is silently swallowed.
//!
//! Note that duplicate-username conflicts answer 400, not 409. Clients
//! already depend on that status, so it is part of the contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Error categories of the directory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required request field missing or empty (400)
    Validation,
    /// Username already taken (400 - contract status, not 409)
    Conflict,
    /// No bearer token presented (401)
    Unauthenticated,
    /// Login username/password mismatch (401)
    InvalidCredentials,
    /// Bearer token malformed or signature invalid (403)
    InvalidToken,
    /// Admin token missing or wrong (403)
    Forbidden,
    /// No record for the requested username (404)
    NotFound,
}

impl ErrorKind {
    /// HTTP status code for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation | Self::Conflict => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Stable code string for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidToken => "invalid_token",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A terminal request error: a kind plus the client-facing message.
#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Missing/empty required field (400).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Duplicate username (400).
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// No token presented (401).
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// Login mismatch (401).
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Bad bearer token (403).
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    /// Admin gate rejection (403).
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Unknown username (404).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    fn log(&self) {
        match self.kind {
            ErrorKind::Unauthenticated
            | ErrorKind::InvalidCredentials
            | ErrorKind::InvalidToken
            | ErrorKind::Forbidden => {
                tracing::warn!(
                    error_kind = %self.kind,
                    message = %self.message,
                    "Auth error"
                );
            }
            _ => {
                tracing::debug!(
                    error_kind = %self.kind,
                    message = %self.message,
                    "Client error"
                );
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

/// JSON error body: `{"error": "<message>"}`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.kind.status_code();
        let body = ErrorBody {
            error: self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<crate::store::StoreError> for AppError {
    fn from(err: crate::store::StoreError) -> Self {
        use crate::store::StoreError;
        match err {
            StoreError::DuplicateUser(_) => AppError::conflict("Username is already taken"),
            StoreError::NotFound(_) => AppError::not_found("User not found"),
        }
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_contract() {
        assert_eq!(ErrorKind::Validation.status_code(), StatusCode::BAD_REQUEST);
        // Duplicate usernames answer 400 in this API, not 409.
        assert_eq!(ErrorKind::Conflict.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorKind::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorKind::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorKind::InvalidToken.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_error_conversion() {
        let err: AppError = crate::store::StoreError::DuplicateUser("alice".into()).into();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Username is already taken");

        let err: AppError = crate::store::StoreError::NotFound("bob".into()).into();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "User not found");
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = AppError::not_found("User not found");
        assert_eq!(format!("{}", err), "not_found: User not found");
    }
}
