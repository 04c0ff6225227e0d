//! Shared application state.

use crate::config::AppConfig;
use crate::store::UserStore;
use crate::token::TokenAuthority;

/// State handed to every handler and middleware.
///
/// Cloning is cheap: the store is backed by an `Arc` and the token
/// authority only holds derived key material.
#[derive(Clone)]
pub struct AppState {
    /// In-memory user directory.
    pub store: UserStore,
    /// Issues and verifies bearer tokens.
    pub tokens: TokenAuthority,
    /// Static secret expected in the `x-admin-token` header.
    pub admin_token: String,
}

impl AppState {
    /// Builds state from configuration, deriving the token authority from
    /// the configured signing secret.
    pub fn from_config(config: &AppConfig) -> Self {
        let store = if config.seed_sample_user {
            UserStore::seeded()
        } else {
            UserStore::new()
        };
        Self {
            store,
            tokens: TokenAuthority::new(&config.signing_secret),
            admin_token: config.admin_token.clone(),
        }
    }
}
