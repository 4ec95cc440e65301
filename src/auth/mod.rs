use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Admin,
    state::AppState,
};

/// Lifetime of an admin access token.
pub const ACCESS_TOKEN_MINUTES: i64 = 30;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (admin email)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

impl Claims {
    pub fn new(email: &str, expiration_minutes: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(expiration_minutes);

        Claims {
            sub: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

// ============================================================================
// JWT Operations
// ============================================================================

pub fn create_access_token(email: &str, secret: &str) -> AppResult<String> {
    let claims = Claims::new(email, ACCESS_TOKEN_MINUTES);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to create JWT: {:?}", e);
        AppError::Auth("Failed to create token".into())
    })
}

pub fn validate_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Token validation failed: {:?}", e);
        AppError::Auth("Invalid authentication credentials".into())
    })
}

// ============================================================================
// Password Hashing
// ============================================================================

pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        AppError::Internal
    })
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash).map_err(|e| {
        tracing::error!("Failed to verify password: {:?}", e);
        AppError::Internal
    })
}

// ============================================================================
// Auth Extractor
// ============================================================================

/// An authenticated admin. Rejects with 401 when the bearer token is missing,
/// invalid, expired, or names an admin that no longer exists.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Auth("Missing or invalid Authorization header".into()))?;

        let claims = validate_token(bearer.token(), &state.jwt_secret)?;

        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, password_hash, created_at FROM admins WHERE email = ?",
        )
        .bind(&claims.sub)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::Auth("Admin not found".into()))?;

        Ok(AuthAdmin {
            id: admin.id,
            email: admin.email,
        })
    }
}
