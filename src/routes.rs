use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeFile, trace::TraceLayer};

use crate::{
    handlers::{self, logo::LOGO_FILE_NAME},
    state::AppState,
};

/// Routes mounted under `/api`.
fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // SEO + robots.txt
        .route(
            "/seo",
            get(handlers::seo::list_seo).post(handlers::seo::create_seo),
        )
        .route(
            "/seo/:page",
            get(handlers::seo::get_seo).put(handlers::seo::upsert_seo),
        )
        .route(
            "/robots-txt",
            get(handlers::seo::get_robots_txt).put(handlers::seo::update_robots_txt),
        )
        .route("/sitemap/generate", get(handlers::sitemap::generate_sitemap))
        // Blogs
        .route(
            "/blogs",
            get(handlers::blogs::list_blogs).post(handlers::blogs::create_blog),
        )
        .route(
            "/blogs/:slug",
            get(handlers::blogs::get_blog)
                .put(handlers::blogs::update_blog)
                .delete(handlers::blogs::delete_blog),
        )
        // Keywords
        .route(
            "/keywords",
            get(handlers::keywords::list_keywords).post(handlers::keywords::create_keyword),
        )
        .route(
            "/keywords/:id",
            axum::routing::delete(handlers::keywords::delete_keyword),
        )
        // Logo
        .route(
            "/logo/upload",
            post(handlers::logo::upload_logo)
                .layer(DefaultBodyLimit::max(handlers::logo::MAX_LOGO_SIZE + 65_536)), // 5 MB + multipart overhead
        )
        .route("/logo/current", get(handlers::logo::current_logo))
        .route("/logo/history", get(handlers::logo::logo_history))
        // Contact
        .route("/contact/submit", post(handlers::contact::submit_contact))
        .route(
            "/contact/submissions",
            get(handlers::contact::list_submissions),
        )
        // Dashboard
        .route("/analytics", get(handlers::analytics::get_analytics))
}

/// Build the full application router. Deployment-only layers (metrics, CORS)
/// are added by the binary.
pub fn app(state: AppState) -> Router {
    let logo_file = state.public_dir.join(LOGO_FILE_NAME);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/robots.txt", get(handlers::sitemap::robots_txt))
        .route("/sitemap.xml", get(handlers::sitemap::sitemap_xml))
        .route_service("/logo.png", ServeFile::new(logo_file))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
