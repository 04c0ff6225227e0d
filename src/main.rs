//! Service entry point.
//!
//! Loads configuration from the environment, warns about weak secrets,
//! builds the hardened router, and serves until SIGINT or SIGTERM.

use tracing::{info, warn};
use wicket::observability::{self, LogFormat, SecurityEvent};
use wicket::{api, secret, security_event, AppConfig, AppState, HardenedRouter};

#[tokio::main]
async fn main() {
    observability::init_tracing(LogFormat::from_env());

    let config = AppConfig::from_env();

    // Weak secrets are reported, not fatal: the defaults exist so the
    // service can run out of the box in development.
    let policy = secret::SecretPolicy::default();
    if !secret::check_and_warn("SIGNING_SECRET", &config.signing_secret, &policy) {
        warn!("Signing secret is weak; set SIGNING_SECRET before deploying");
    }
    if !secret::check_and_warn("ADMIN_TOKEN", &config.admin_token, &policy) {
        warn!("Admin token is weak; set ADMIN_TOKEN before deploying");
    }

    let state = AppState::from_config(&config);
    info!(users = state.store.len(), "User store initialized");

    let app = api::router(state).with_hardening(&config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind {}: {err}", config.bind_addr));

    security_event!(SecurityEvent::SystemStartup, bind_addr = config.bind_addr.as_str());
    info!(bind_addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    security_event!(SecurityEvent::SystemShutdown);
}

/// Resolves when SIGINT or SIGTERM arrives, letting in-flight requests
/// drain before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
