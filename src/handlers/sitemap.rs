use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::seo::latest_robots;
use crate::{
    error::AppResult,
    sitemap::{build_sitemap, SitemapEntry, DEFAULT_ROBOTS_TXT},
    state::AppState,
};

async fn published_entries(state: &AppState) -> AppResult<Vec<SitemapEntry>> {
    Ok(sqlx::query_as::<_, SitemapEntry>(
        "SELECT slug, updated_at FROM blogs
         WHERE published = 1
         ORDER BY created_at DESC, rowid DESC
         LIMIT 1000",
    )
    .fetch_all(&state.pool)
    .await?)
}

fn xml(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

/// GET /api/sitemap/generate: sitemap rooted at the configured base URL.
pub async fn generate_sitemap(State(state): State<AppState>) -> AppResult<Response> {
    let entries = published_entries(&state).await?;
    Ok(xml(build_sitemap(&state.site_base_url, &entries)))
}

/// GET /sitemap.xml: sitemap rooted at the canonical public URL.
pub async fn sitemap_xml(State(state): State<AppState>) -> AppResult<Response> {
    let entries = published_entries(&state).await?;
    Ok(xml(build_sitemap(&state.public_site_url, &entries)))
}

/// GET /robots.txt: plain text for crawlers.
pub async fn robots_txt(State(state): State<AppState>) -> AppResult<Response> {
    let content = latest_robots(&state)
        .await?
        .map(|r| r.content)
        .unwrap_or_else(|| DEFAULT_ROBOTS_TXT.to_string());

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content).into_response())
}
