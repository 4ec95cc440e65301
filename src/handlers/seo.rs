use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json as SqlJson;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthAdmin,
    error::{AppError, AppResult},
    models::{RobotsTxt, RobotsTxtContent, SeoSettings, SeoSettingsDto, SitePage},
    sitemap::default_api_robots_txt,
    state::AppState,
};

const SEO_COLUMNS: &str = "id, page, title, description, keywords, og_image, json_ld, updated_at";

// ============================================================================
// Helpers
// ============================================================================

/// JSON-LD must be an object; an explicit `null` clears it.
fn normalize_json_ld(json_ld: Option<Value>) -> AppResult<Option<SqlJson<Value>>> {
    match json_ld {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Object(_)) => Ok(Some(SqlJson(v))),
        Some(_) => Err(AppError::Validation("json_ld must be a JSON object".into())),
    }
}

/// Treat empty strings from form submissions as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn upsert(state: &AppState, page: SitePage, dto: SeoSettingsDto) -> AppResult<SeoSettings> {
    let json_ld = normalize_json_ld(dto.json_ld)?;

    let seo = sqlx::query_as::<_, SeoSettings>(&format!(
        "INSERT INTO seo_settings (id, page, title, description, keywords, og_image, json_ld, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT (page) DO UPDATE SET
             title       = excluded.title,
             description = excluded.description,
             keywords    = excluded.keywords,
             og_image    = excluded.og_image,
             json_ld     = excluded.json_ld,
             updated_at  = excluded.updated_at
         RETURNING {SEO_COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(page)
    .bind(non_empty(dto.title))
    .bind(non_empty(dto.description))
    .bind(non_empty(dto.keywords))
    .bind(non_empty(dto.og_image))
    .bind(json_ld)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    Ok(seo)
}

// ============================================================================
// SEO Handlers
// ============================================================================

/// GET /api/seo
pub async fn list_seo(State(state): State<AppState>) -> AppResult<Json<Vec<SeoSettings>>> {
    let settings = sqlx::query_as::<_, SeoSettings>(&format!(
        "SELECT {SEO_COLUMNS} FROM seo_settings ORDER BY page ASC"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(settings))
}

/// GET /api/seo/:page: 404 for unknown pages as well as missing entries.
pub async fn get_seo(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> AppResult<Json<SeoSettings>> {
    let page = SitePage::from_str(&page)
        .map_err(|_| AppError::NotFound("SEO settings not found".into()))?;

    let seo = sqlx::query_as::<_, SeoSettings>(&format!(
        "SELECT {SEO_COLUMNS} FROM seo_settings WHERE page = ?"
    ))
    .bind(page)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("SEO settings not found".into()))?;

    Ok(Json(seo))
}

/// POST /api/seo: create the entry for a page that has none yet.
pub async fn create_seo(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(req): Json<SeoSettingsDto>,
) -> AppResult<(StatusCode, Json<SeoSettings>)> {
    let page = req
        .page
        .ok_or_else(|| AppError::Validation("page is required".into()))?;

    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM seo_settings WHERE page = ?")
        .bind(page)
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "SEO settings already exist for this page".into(),
        ));
    }

    let seo = upsert(&state, page, req).await?;
    info!(page = %page, admin = %admin.email, "SEO settings created");
    Ok((StatusCode::CREATED, Json(seo)))
}

/// PUT /api/seo/:page: create or replace the entry for `page`.
pub async fn upsert_seo(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Path(page): Path<String>,
    Json(req): Json<SeoSettingsDto>,
) -> AppResult<Json<SeoSettings>> {
    let page = SitePage::from_str(&page)
        .map_err(|_| AppError::Validation(format!("Unknown page '{page}'")))?;

    let seo = upsert(&state, page, req).await?;
    info!(page = %page, admin = %admin.email, "SEO settings saved");
    Ok(Json(seo))
}

// ============================================================================
// robots.txt Handlers
// ============================================================================

pub(crate) async fn latest_robots(state: &AppState) -> AppResult<Option<RobotsTxt>> {
    Ok(sqlx::query_as::<_, RobotsTxt>(
        "SELECT id, content, updated_at FROM robots_txt
         ORDER BY updated_at DESC, rowid DESC LIMIT 1",
    )
    .fetch_optional(&state.pool)
    .await?)
}

/// GET /api/robots-txt
pub async fn get_robots_txt(State(state): State<AppState>) -> AppResult<Json<RobotsTxtContent>> {
    let content = match latest_robots(&state).await? {
        Some(robots) => robots.content,
        None => default_api_robots_txt(&state.site_base_url),
    };
    Ok(Json(RobotsTxtContent { content }))
}

/// PUT /api/robots-txt: replace the stored content.
pub async fn update_robots_txt(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(req): Json<RobotsTxtContent>,
) -> AppResult<Json<RobotsTxt>> {
    let mut tx = state.pool.begin().await?;

    sqlx::query("DELETE FROM robots_txt")
        .execute(&mut *tx)
        .await?;

    let robots = sqlx::query_as::<_, RobotsTxt>(
        "INSERT INTO robots_txt (id, content, updated_at) VALUES (?, ?, ?)
         RETURNING id, content, updated_at",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&req.content)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(admin = %admin.email, "robots.txt updated");
    Ok(Json(robots))
}
