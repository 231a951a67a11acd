//! Application state

use metrics_exporter_prometheus::PrometheusHandle;
use profilehub_auth::{AuthError, JwtManager, PasswordManager};
use profilehub_db::Database;
use std::sync::Arc;

/// Handle used to render the Prometheus exposition
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub passwords: Arc<PasswordManager>,
    /// Hash verified against when a login email is unknown, so both paths cost the same
    pub(crate) dummy_hash: Arc<str>,
}

impl AppState {
    pub fn new(
        db: Database,
        jwt: Arc<JwtManager>,
        passwords: Arc<PasswordManager>,
    ) -> Result<Self, AuthError> {
        let dummy_hash = passwords.hash("profilehub-unknown-account")?;
        Ok(Self {
            db,
            jwt,
            passwords,
            dummy_hash: dummy_hash.into(),
        })
    }
}
