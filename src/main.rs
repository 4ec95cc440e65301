use std::sync::Arc;

use axum::http::HeaderValue;
use axum_prometheus::PrometheusMetricLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use techresona_server::config::Config;
use techresona_server::state::AppState;
use techresona_server::{db, routes};

#[tokio::main]
async fn main() {
    // Initialize tracing. JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("techresona_server=info,tower_http=info,sqlx=warn")
    });

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 TechResona server starting...");

    // Fatal if JWT_SECRET is missing (production) or too short.
    let config = Config::from_env().expect("Failed to load configuration");
    info!("📝 Configuration loaded");

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    info!("✅ Database migrations applied");

    db::health_check(&pool)
        .await
        .expect("Database health check failed");
    info!("✅ Database health check passed");

    // CORS: any origin unless CORS_ORIGINS lists specific ones.
    let cors = match &config.cors_origins {
        None => {
            info!("🔓 CORS: any origin");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        tracing::warn!(origin = %o, "Ignoring malformed CORS origin");
                        None
                    }
                })
                .collect();
            info!("🔒 CORS: {} allowed origin(s)", origins.len());
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    tokio::fs::create_dir_all(&config.public_dir)
        .await
        .expect("Failed to create public directory");
    info!("📂 Public directory: {}", config.public_dir.display());

    let addr = config.server_addr();

    let app_state = AppState {
        pool,
        jwt_secret: Arc::from(config.jwt_secret.as_str()),
        public_dir: config.public_dir.clone(),
        site_base_url: Arc::from(config.site_base_url.as_str()),
        public_site_url: Arc::from(config.public_site_url.as_str()),
        slack_webhook_url: config.slack_webhook_url.as_deref().map(Arc::from),
        smtp: config.smtp.clone().map(Arc::new),
        http_client: reqwest::Client::new(),
    };

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = routes::app(app_state)
        .route(
            "/metrics",
            axum::routing::get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer)
        .layer(cors);

    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
