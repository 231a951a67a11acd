//! API routes

mod accounts;
mod health;
pub mod metrics;

use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::state::{AppState, MetricsHandle};

pub use accounts::{RequireAdmin, RequireAuth};

/// Create the main router
pub fn create_router(
    state: AppState,
    metrics_handle: Option<Arc<MetricsHandle>>,
    static_dir: Option<&Path>,
) -> Router {
    let mut router = Router::new()
        // Health check
        .merge(health::routes())
        // Account API
        .merge(accounts::routes())
        .with_state(state);

    // Add metrics endpoint if handle is provided
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    // Static frontend, if configured - must be last to not interfere with API routes
    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}
