//! # Wicket
//!
//! A small user-directory HTTP service: register, log in, and manage users
//! over JSON, with two stacked authentication gates in front of the
//! directory routes.
//!
//! ## Features
//!
//! - **Bearer gate**: HS256 bearer tokens issued at login, verified by
//!   signature alone
//! - **Admin gate**: static `x-admin-token` header, compared in constant
//!   time, guarding the directory-listing routes
//! - **In-memory store**: users live in a shared vector behind a lock;
//!   nothing persists across restarts
//! - **Hardening layers**: request timeout, body size limit, security
//!   response headers
//! - **Audit trail**: structured security events with correlation IDs via
//!   tracing
//!
//! ## Quick Start
//!
//! ```ignore
//! use wicket::{api, observability, AppConfig, AppState, HardenedRouter};
//!
//! #[tokio::main]
//! async fn main() {
//!     observability::init_tracing(observability::LogFormat::from_env());
//!
//!     let config = AppConfig::from_env();
//!     let state = AppState::from_config(&config);
//!     let app = api::router(state).with_hardening(&config);
//!
//!     let listener = tokio::net::TcpListener::bind(&config.bind_addr)
//!         .await
//!         .expect("bind failed");
//!     axum::serve(listener, app).await.expect("server error");
//! }
//! ```

pub mod api;
pub mod audit;
pub mod auth;
mod config;
pub mod error;
mod layers;
pub mod observability;
mod parse;
pub mod secret;
mod state;
pub mod store;
pub mod token;

// Re-exports
pub use auth::AuthIdentity;
pub use config::{AppConfig, AppConfigBuilder, ADMIN_TOKEN_HEADER};
pub use error::{AppError, ErrorKind};
pub use layers::HardenedRouter;
pub use parse::{parse_duration, parse_size};
pub use state::AppState;
pub use store::{PublicUser, User, UserStore};
pub use token::{AccessClaims, TokenAuthority};
