use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::SqlitePool;
use validator::ValidationErrors;

use crate::{
    error::{AppError, AppResult},
    models::Blog,
};

/// Lowercase words separated by single hyphens: `cloud-migration-2025`.
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex is valid"));

pub const BLOG_COLUMNS: &str = "id, slug, title, excerpt, content, keywords, meta_description, \
     author, published, featured_image, created_at, updated_at";

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Reject a required text field that is present but only whitespace.
pub fn ensure_not_blank(field: &str, value: Option<&str>) -> AppResult<()> {
    if value.is_some_and(|v| v.trim().is_empty()) {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Flatten validator messages into one comma-separated string for the
/// `{"error": ...}` body.
pub fn validation_message(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|v| v.iter())
        .map(|e| match &e.message {
            Some(m) => m.to_string(),
            None => format!("Invalid value ({})", e.code),
        })
        .collect();
    messages.sort();
    AppError::Validation(messages.join(", "))
}

/// Fetch a blog by slug, returning 404 if it does not exist.
pub async fn fetch_blog(pool: &SqlitePool, slug: &str) -> AppResult<Blog> {
    sqlx::query_as::<_, Blog>(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE slug = ?"))
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))
}
