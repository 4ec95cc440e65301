use axum::{extract::State, Json};

use crate::{auth::AuthAdmin, error::AppResult, models::AnalyticsDto, state::AppState};

/// GET /api/analytics: dashboard counters plus the five most recently
/// updated post titles.
pub async fn get_analytics(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> AppResult<Json<AnalyticsDto>> {
    let total_pages: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seo_settings")
        .fetch_one(&state.pool)
        .await?;
    let total_blogs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs")
        .fetch_one(&state.pool)
        .await?;
    let total_keywords: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM keywords")
        .fetch_one(&state.pool)
        .await?;

    let recent_updates: Vec<String> = sqlx::query_scalar(
        "SELECT title FROM blogs ORDER BY updated_at DESC, rowid DESC LIMIT 5",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(AnalyticsDto {
        total_pages,
        total_blogs,
        total_keywords,
        recent_updates,
    }))
}
