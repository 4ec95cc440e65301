use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::shared::validation_message;
use crate::{
    auth::{create_access_token, hash_password, verify_password},
    error::{AppError, AppResult},
    models::{Admin, AdminCredentials, TokenResponse},
    state::AppState,
};

/// POST /api/auth/register: create an admin account and return a token.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<AdminCredentials>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    req.validate().map_err(validation_message)?;

    let email = req.email.trim().to_lowercase();
    info!("Registering new admin: {}", email);

    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM admins WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&req.password)?;

    // The UNIQUE constraint still guards against a concurrent registration;
    // From<sqlx::Error> maps that to 409 as well.
    sqlx::query("INSERT INTO admins (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(&email)
        .bind(&password_hash)
        .bind(Utc::now())
        .execute(&state.pool)
        .await?;

    info!("Admin created: {}", email);

    let access_token = create_access_token(&email, &state.jwt_secret)?;
    Ok((StatusCode::CREATED, Json(TokenResponse::bearer(access_token))))
}

/// POST /api/auth/login: exchange email and password for a token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<AdminCredentials>,
) -> AppResult<Json<TokenResponse>> {
    let email = req.email.trim().to_lowercase();
    info!("Login attempt for admin: {}", email);

    let admin = sqlx::query_as::<_, Admin>(
        "SELECT id, email, password_hash, created_at FROM admins WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Auth("Invalid email or password".into()))?;

    if !verify_password(&req.password, &admin.password_hash)? {
        return Err(AppError::Auth("Invalid email or password".into()));
    }

    info!("Login successful: {} ({})", admin.email, admin.id);

    let access_token = create_access_token(&admin.email, &state.jwt_secret)?;
    Ok(Json(TokenResponse::bearer(access_token)))
}
