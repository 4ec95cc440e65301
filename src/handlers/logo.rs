use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

use crate::{
    auth::AuthAdmin,
    error::{AppError, AppResult},
    models::{CurrentLogo, Logo, LogoUploadResponse},
    state::AppState,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum logo size in bytes (5 MB).
pub const MAX_LOGO_SIZE: usize = 5 * 1024 * 1024;

/// Public URL path of the active logo.
pub const LOGO_PUBLIC_PATH: &str = "/logo.png";

/// File name of the active logo inside the public directory.
pub const LOGO_FILE_NAME: &str = "logo.png";

const LOGO_COLUMNS: &str = "id, filename, path, uploaded_by, uploaded_at";

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/logo/upload: replace the site logo (admin only).
///
/// Expects a `multipart/form-data` body with one file field named `file`.
/// The image type is detected from magic bytes, not from the client-supplied
/// Content-Type header. The file is staged next to the live logo and only
/// renamed into place once the history row is stored. A failed insert leaves
/// the current logo untouched, and a failed rename removes the stored row.
pub async fn upload_logo(
    State(state): State<AppState>,
    admin: AuthAdmin,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<LogoUploadResponse>)> {
    let (filename, data) = read_logo_field(&mut multipart).await?;

    let mime_type = infer::get(&data)
        .map(|t| t.mime_type())
        .unwrap_or("application/octet-stream");
    if !mime_type.starts_with("image/") {
        return Err(AppError::Validation("File must be an image".into()));
    }

    tokio::fs::create_dir_all(&state.public_dir).await.map_err(|e| {
        tracing::error!(error = ?e, path = ?state.public_dir, "Failed to create public directory");
        AppError::Internal
    })?;

    let live_path = state.public_dir.join(LOGO_FILE_NAME);
    let staged_path = state
        .public_dir
        .join(format!(".{}.{LOGO_FILE_NAME}", Uuid::new_v4().simple()));

    if let Err(e) = tokio::fs::write(&staged_path, &data).await {
        tracing::error!(error = ?e, path = ?staged_path, "Failed to write uploaded logo");
        return Err(AppError::Internal);
    }

    let logo_id = Uuid::new_v4().to_string();
    let inserted = sqlx::query(
        "INSERT INTO logos (id, filename, path, uploaded_by, uploaded_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&logo_id)
    .bind(&filename)
    .bind(LOGO_PUBLIC_PATH)
    .bind(&admin.email)
    .bind(Utc::now())
    .execute(&state.pool)
    .await;

    if let Err(e) = inserted {
        tracing::error!(error = ?e, "Failed to record logo upload; discarding file");
        cleanup_file(&staged_path).await;
        return Err(AppError::from(e));
    }

    if let Err(e) = tokio::fs::rename(&staged_path, &live_path).await {
        tracing::error!(error = ?e, path = ?live_path, "Failed to move logo into place");
        if let Err(e) = sqlx::query("DELETE FROM logos WHERE id = ?")
            .bind(&logo_id)
            .execute(&state.pool)
            .await
        {
            tracing::error!(error = ?e, id = %logo_id, "Failed to remove history row for unplaced logo");
        }
        cleanup_file(&staged_path).await;
        return Err(AppError::Internal);
    }

    tracing::info!(admin = %admin.email, filename = %filename, mime = mime_type, "Logo uploaded");

    Ok((
        StatusCode::CREATED,
        Json(LogoUploadResponse {
            message: "Logo uploaded successfully".into(),
            path: LOGO_PUBLIC_PATH.into(),
            filename,
        }),
    ))
}

/// GET /api/logo/current: newest upload, or the bundled default.
pub async fn current_logo(State(state): State<AppState>) -> AppResult<Json<CurrentLogo>> {
    let logo = sqlx::query_as::<_, Logo>(&format!(
        "SELECT {LOGO_COLUMNS} FROM logos ORDER BY uploaded_at DESC, rowid DESC LIMIT 1"
    ))
    .fetch_optional(&state.pool)
    .await?;

    Ok(Json(logo.map(CurrentLogo::from).unwrap_or_default()))
}

/// GET /api/logo/history: newest first, capped at 100 entries.
pub async fn logo_history(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> AppResult<Json<Vec<Logo>>> {
    let logos = sqlx::query_as::<_, Logo>(&format!(
        "SELECT {LOGO_COLUMNS} FROM logos ORDER BY uploaded_at DESC, rowid DESC LIMIT 100"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(logos))
}

// ============================================================================
// Private helpers
// ============================================================================

/// Pull the first `file` field out of the multipart body, enforcing the size
/// limit. Other fields are ignored.
async fn read_logo_field(multipart: &mut Multipart) -> AppResult<(String, Bytes)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!(error = ?e, "Failed to read multipart field");
        AppError::Validation("Invalid multipart data".into())
    })? {
        if field.name().unwrap_or("") != "file" {
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or(LOGO_FILE_NAME));

        let data = field.bytes().await.map_err(|e| {
            tracing::warn!(error = ?e, "Failed to read multipart field bytes");
            AppError::Validation("Failed to read file data".into())
        })?;

        if data.is_empty() {
            return Err(AppError::Validation("File must not be empty".into()));
        }
        if data.len() > MAX_LOGO_SIZE {
            return Err(AppError::Validation("File size must be less than 5MB".into()));
        }

        return Ok((filename, data));
    }

    Err(AppError::Validation(
        "No file provided; include a field named \"file\"".into(),
    ))
}

async fn cleanup_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(error = ?e, path = ?path, "Failed to clean up staged logo file");
    }
}

/// Replace any character that is not alphanumeric, dot, underscore, or hyphen
/// with an underscore, and cap the result at 128 characters.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(128)
        .collect();

    if sanitized.is_empty() {
        LOGO_FILE_NAME.to_string()
    } else {
        sanitized
    }
}
