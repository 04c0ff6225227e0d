//! Hardening layers for the router.
//!
//! Provides the [`HardenedRouter`] extension trait that wraps the route
//! table with the middleware every deployment of this service should carry:
//! request timeout, body size limit, security response headers, the audit
//! middleware, and HTTP tracing.

use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware;
use axum::Router;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::audit::audit_middleware;
use crate::config::AppConfig;

/// Extension trait applying the hardening stack to a router.
///
/// ```ignore
/// let app = wicket::api::router(state).with_hardening(&config);
/// ```
pub trait HardenedRouter {
    /// Apply the hardening layers, outermost first:
    ///
    /// 1. `TraceLayer` - request/response tracing
    /// 2. Audit middleware - correlation ID, client IP, denial events
    /// 3. Security response headers
    /// 4. Request body limit
    /// 5. Timeout (innermost)
    fn with_hardening(self, config: &AppConfig) -> Self;
}

impl<S> HardenedRouter for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_hardening(self, config: &AppConfig) -> Self {
        let mut router = self;

        // Slow or hanging requests time out with 408 rather than holding
        // a connection open.
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ));

        // Oversized bodies are rejected before deserialization.
        router = router.layer(RequestBodyLimitLayer::new(config.max_request_size));

        if config.security_headers_enabled {
            router = router
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
                ))
                // Tokens and user records must not land in shared caches.
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
                ));
        }

        router = router.layer(middleware::from_fn(audit_middleware));

        if config.tracing_enabled {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }
}
