use std::env;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEV_JWT_SECRET: &str = "dev_secret_change_in_production_0123456789";
const MIN_JWT_SECRET_LEN: usize = 32;

pub const DEFAULT_PUBLIC_SITE_URL: &str = "https://techresona.com";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_CONTACT_EMAIL: &str = "info@techresona.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in production")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters")]
    WeakJwtSecret,

    #[error("{name} is not a valid port: {value}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Outgoing mail for contact-form notifications. Sent with STARTTLS from
/// `username` to `contact_email`.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Option<String>,
    pub contact_email: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("contact_email", &self.contact_email)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    /// `None` means any origin is allowed.
    pub cors_origins: Option<Vec<String>>,
    pub site_base_url: String,
    pub public_site_url: String,
    pub public_dir: PathBuf,
    pub slack_webhook_url: Option<String>,
    /// `None` when `SMTP_USER` is unset; contact email is then skipped.
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let is_dev = env::var("APP_ENV").as_deref() != Ok("production");

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_JWT_SECRET_LEN => secret,
            Ok(_) => return Err(ConfigError::WeakJwtSecret),
            Err(_) if is_dev => DEV_JWT_SECRET.to_string(),
            Err(_) => return Err(ConfigError::MissingJwtSecret),
        };

        let server_port = match env::var("SERVER_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                name: "SERVER_PORT",
                value,
            })?,
            Err(_) => 8001,
        };

        let smtp = smtp_from_env()?;

        let public_site_url = url_var("PUBLIC_SITE_URL", DEFAULT_PUBLIC_SITE_URL)?;
        let site_base_url = url_var("SITE_BASE_URL", &public_site_url)?;

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://techresona.db?mode=rwc".to_string()),
            jwt_secret,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port,
            is_dev,
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default()),
            site_base_url,
            public_site_url,
            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public")),
            slack_webhook_url: env::var("SLACK_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            smtp,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn smtp_from_env() -> Result<Option<SmtpConfig>, ConfigError> {
    let Some(username) = env::var("SMTP_USER").ok().filter(|u| !u.trim().is_empty()) else {
        return Ok(None);
    };

    let port = match env::var("SMTP_PORT") {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
            name: "SMTP_PORT",
            value,
        })?,
        Err(_) => DEFAULT_SMTP_PORT,
    };

    Ok(Some(SmtpConfig {
        host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
        port,
        username,
        password: env::var("SMTP_PASSWORD").ok(),
        contact_email: env::var("CONTACT_EMAIL")
            .unwrap_or_else(|_| DEFAULT_CONTACT_EMAIL.to_string()),
    }))
}

/// Read a URL-valued variable, validate it, and strip any trailing slash so
/// paths can be appended directly.
fn url_var(name: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { name, source })?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Split a comma-separated origin list. Empty input or a `*` entry means
/// "allow any origin".
fn parse_origins(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        None
    } else {
        Some(origins)
    }
}
