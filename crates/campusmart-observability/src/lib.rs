//! Campusmart observability.
//!
//! - Structured logging through `tracing`, to the console and to a daily
//!   rolling JSON file
//! - Per-request logging middleware with request ids
//! - Prometheus metrics (feature `observability`, on by default), further
//!   switchable at runtime with `OBSERVABILITY_ENABLED`
//!
//! # Examples
//!
//! ```no_run
//! use campusmart_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let _guard = init_tracing()?;
//!     let _metrics = init_metrics();
//!     Ok(())
//! }
//! ```

pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use logging::{REQUEST_ID_HEADER, init_tracing, logging_middleware};

#[cfg(feature = "observability")]
pub use metrics::{
    PrometheusHandle, init_metrics, is_observability_enabled, metrics_middleware, metrics_routes,
    track_login, track_ownership_denied, track_resource_created, track_resource_deleted,
    track_token_refresh, track_user_registered,
};

// No-op stubs when metrics are compiled out
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    #[derive(Clone)]
    pub struct PrometheusHandle;

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn metrics_routes<S: Clone + Send + Sync + 'static>(_handle: PrometheusHandle) -> Router<S> {
        Router::new()
    }

    pub fn track_user_registered(_method: &'static str) {}
    pub fn track_login(_outcome: &'static str) {}
    pub fn track_token_refresh(_outcome: &'static str) {}
    pub fn track_resource_created(_kind: &'static str) {}
    pub fn track_resource_deleted(_kind: &'static str) {}
    pub fn track_ownership_denied(_kind: &'static str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
