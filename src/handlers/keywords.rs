use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::shared::validation_message;
use crate::{
    auth::AuthAdmin,
    error::{AppError, AppResult},
    models::{CreateKeywordDto, Keyword, MessageResponse},
    state::AppState,
};

/// GET /api/keywords
pub async fn list_keywords(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> AppResult<Json<Vec<Keyword>>> {
    let keywords = sqlx::query_as::<_, Keyword>(
        "SELECT id, keyword, page, ranking, search_volume, difficulty, tracked_at
         FROM keywords
         ORDER BY tracked_at ASC, rowid ASC
         LIMIT 1000",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(keywords))
}

/// POST /api/keywords: start tracking a keyword for a page.
pub async fn create_keyword(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(req): Json<CreateKeywordDto>,
) -> AppResult<(StatusCode, Json<Keyword>)> {
    req.validate().map_err(validation_message)?;

    let keyword_text = req.keyword.trim();
    if keyword_text.is_empty() {
        return Err(AppError::Validation("Keyword must be 1–200 characters".into()));
    }

    let keyword = sqlx::query_as::<_, Keyword>(
        "INSERT INTO keywords (id, keyword, page, ranking, search_volume, difficulty, tracked_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING id, keyword, page, ranking, search_volume, difficulty, tracked_at",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(keyword_text)
    .bind(req.page)
    .bind(req.ranking)
    .bind(req.search_volume)
    .bind(req.difficulty)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    info!(keyword = %keyword.keyword, page = %keyword.page, admin = %admin.email, "Keyword tracked");
    Ok((StatusCode::CREATED, Json(keyword)))
}

/// DELETE /api/keywords/:id
pub async fn delete_keyword(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Path(keyword_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let result = sqlx::query("DELETE FROM keywords WHERE id = ?")
        .bind(&keyword_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Keyword not found".into()));
    }

    info!(keyword_id = %keyword_id, admin = %admin.email, "Keyword deleted");
    Ok(Json(MessageResponse {
        message: "Keyword deleted successfully".into(),
    }))
}
