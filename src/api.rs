//! HTTP surface of the user directory.
//!
//! Request/response DTOs, the seven handlers, and the router that wires
//! them to the authentication gates:
//!
//! | Route                       | Gate            |
//! |-----------------------------|-----------------|
//! | `POST /register`            | open            |
//! | `POST /login`               | open            |
//! | `GET /users`                | bearer + admin  |
//! | `GET /users/{username}`     | bearer + admin  |
//! | `GET /users/me`             | bearer          |
//! | `PUT /users/{username}/password` | bearer     |
//! | `DELETE /users/{username}`  | bearer          |
//!
//! Any caller holding a valid bearer token may change or delete any user;
//! the token's identity is only consulted by `/users/me`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::{self, AuthIdentity};
use crate::error::{AppError, Result};
use crate::observability::SecurityEvent;
use crate::security_event;
use crate::state::AppState;
use crate::store::{PublicUser, User};

// ===== Request Bodies =====

/// Body of `POST /register`. Only the username and password are required;
/// profile fields are stored as given.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body of `PUT /users/{username}/password`.
#[derive(Debug, Deserialize)]
pub struct PasswordUpdateRequest {
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

// ===== Response Bodies =====

/// Generic `{"message": ...}` envelope for state-changing operations.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"token": ...}` envelope returned by login.
#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub token: String,
}

/// Body of `GET /users/{username}`: existence confirmation only, no
/// profile fields.
#[derive(Debug, Serialize)]
pub struct UsernameBody {
    pub username: String,
}

// ===== Handlers =====

/// `POST /register` - create a user.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response> {
    let (username, password) = require_credentials(body.username, body.password)?;

    let user = User {
        username: username.clone(),
        password,
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
    };
    state.store.insert(user)?;

    security_event!(SecurityEvent::UserRegistered, username = username.as_str());
    Ok((
        StatusCode::CREATED,
        Json(MessageBody::new("User registered successfully")),
    )
        .into_response())
}

/// `POST /login` - verify credentials and issue a bearer token.
///
/// Login has exactly two outcomes: a token or 401. Absent fields are not
/// reported separately; they simply never match a stored record.
async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Result<Response> {
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let user = state
        .store
        .authenticate(&username, &password)
        .ok_or_else(|| {
            security_event!(
                SecurityEvent::AuthenticationFailure,
                reason = "bad credentials",
                username = username.as_str()
            );
            AppError::invalid_credentials("Invalid credentials")
        })?;

    let token = state.tokens.issue(&user.username);
    security_event!(SecurityEvent::TokenIssued, username = user.username.as_str());
    Ok(Json(TokenBody { token }).into_response())
}

/// `GET /users` - full directory listing, passwords stripped.
async fn list_users(State(state): State<AppState>) -> Json<Vec<PublicUser>> {
    let users = state.store.list().iter().map(PublicUser::from).collect();
    Json(users)
}

/// `GET /users/{username}` - confirms a user exists.
///
/// Answers with the username alone; the full projection is only available
/// through the listing.
async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UsernameBody>> {
    let user = state
        .store
        .find(&username)
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(UsernameBody {
        username: user.username,
    }))
}

/// `GET /users/me` - the caller's own record.
///
/// Returns the stored record verbatim, password included. The record is
/// looked up by the username in the token; a token naming a since-deleted
/// user gets 404.
async fn current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<User>> {
    let user = state
        .store
        .find(&identity.username)
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}

/// `PUT /users/{username}/password` - overwrite a user's password.
async fn update_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(identity): Extension<AuthIdentity>,
    Json(body): Json<PasswordUpdateRequest>,
) -> Result<Json<MessageBody>> {
    let new_password = body
        .new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::validation("New password required"))?;

    state.store.update_password(&username, &new_password)?;

    security_event!(
        SecurityEvent::PasswordChanged,
        username = username.as_str(),
        changed_by = identity.username.as_str()
    );
    Ok(Json(MessageBody::new("Password updated successfully")))
}

/// `DELETE /users/{username}` - remove a user.
async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<MessageBody>> {
    state.store.delete(&username)?;

    security_event!(
        SecurityEvent::UserDeleted,
        username = username.as_str(),
        deleted_by = identity.username.as_str()
    );
    Ok(Json(MessageBody::new("User deleted successfully")))
}

/// Registration demands a non-empty username and password, with one
/// error message for any missing piece.
fn require_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String)> {
    match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
        _ => Err(AppError::validation("Username and password are required")),
    }
}

// ===== Router =====

/// Assembles the full route table with gates applied per route group.
///
/// `/users/me` is registered as a static segment, so it wins over the
/// `/users/{username}` capture even though the groups carry different
/// middleware stacks.
pub fn router(state: AppState) -> Router {
    let open = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let bearer_only = Router::new()
        .route("/users/me", get(current_user))
        .route("/users/{username}/password", put(update_password))
        .route("/users/{username}", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    let admin = Router::new()
        .route("/users", get(list_users))
        .route("/users/{username}", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin_token,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .merge(open)
        .merge(bearer_only)
        .merge(admin)
        .with_state(state)
}

// ===== Tests =====
