use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::SmtpConfig;

/// Shared application state passed to all handlers and extractors.
/// The JWT secret and site URLs are read once at startup rather than
/// re-reading the environment on every request.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_secret: Arc<str>,
    /// Directory the public site is served from; uploaded logos land here.
    pub public_dir: PathBuf,
    /// Base URL used by `/api/sitemap/generate`.
    pub site_base_url: Arc<str>,
    /// Canonical production URL used by `/sitemap.xml`.
    pub public_site_url: Arc<str>,
    pub slack_webhook_url: Option<Arc<str>>,
    pub smtp: Option<Arc<SmtpConfig>>,
    pub http_client: reqwest::Client,
}
