use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

pub const DEFAULT_AUTHOR: &str = "TechResona Team";

// ============================================================================
// Site Pages
// ============================================================================

/// The fixed set of public pages that carry SEO entries and tracked keywords.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    sqlx::Type,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SitePage {
    Home,
    About,
    Services,
    Contact,
    Blog,
}

// ============================================================================
// Admin Models
// ============================================================================

/// Internal database row. Not serializable so password_hash never leaks.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AdminCredentials {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8–128 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        TokenResponse {
            access_token,
            token_type: "bearer".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Blog Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Blog {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub keywords: String,
    pub meta_description: String,
    pub author: String,
    pub published: bool,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateBlogDto {
    #[validate(length(min = 1, max = 200, message = "Slug must be 1–200 characters"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Excerpt is required"))]
    pub excerpt: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub keywords: String,
    pub meta_description: String,
    pub author: Option<String>,
    pub published: Option<bool>,
    pub featured_image: Option<String>,
}

/// Partial update; `None` fields are left untouched. A blank
/// `featured_image` removes the image. The slug and author are not
/// updatable.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateBlogDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    #[serde(default = "default_published_only")]
    pub published_only: bool,
}

fn default_published_only() -> bool {
    true
}

// ============================================================================
// SEO Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct SeoSettings {
    pub id: String,
    pub page: SitePage,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub og_image: Option<String>,
    pub json_ld: Option<Json<Value>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SeoSettingsDto {
    /// Required on create; on upsert the path segment wins.
    pub page: Option<SitePage>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub og_image: Option<String>,
    pub json_ld: Option<Value>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct RobotsTxt {
    pub id: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RobotsTxtContent {
    pub content: String,
}

// ============================================================================
// Keyword Models
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, sqlx::Type, Display, EnumString, EnumIter,
)]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Keyword {
    pub id: String,
    pub keyword: String,
    pub page: SitePage,
    pub ranking: Option<i64>,
    pub search_volume: Option<i64>,
    pub difficulty: Option<Difficulty>,
    pub tracked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateKeywordDto {
    #[validate(length(min = 1, max = 200, message = "Keyword must be 1–200 characters"))]
    pub keyword: String,
    pub page: SitePage,
    #[validate(range(min = 1, message = "Ranking must be positive"))]
    pub ranking: Option<i64>,
    #[validate(range(min = 0, message = "Search volume cannot be negative"))]
    pub search_volume: Option<i64>,
    pub difficulty: Option<Difficulty>,
}

// ============================================================================
// Logo Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Logo {
    pub id: String,
    pub filename: String,
    pub path: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

/// The logo currently in use. Before the first upload only `path` and
/// `filename` are known.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CurrentLogo {
    pub path: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Default for CurrentLogo {
    fn default() -> Self {
        CurrentLogo {
            path: "/logo.png".into(),
            filename: "logo.png".into(),
            id: None,
            uploaded_by: None,
            uploaded_at: None,
        }
    }
}

impl From<Logo> for CurrentLogo {
    fn from(logo: Logo) -> Self {
        CurrentLogo {
            path: logo.path,
            filename: logo.filename,
            id: Some(logo.id),
            uploaded_by: Some(logo.uploaded_by),
            uploaded_at: Some(logo.uploaded_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogoUploadResponse {
    pub message: String,
    pub path: String,
    pub filename: String,
}

// ============================================================================
// Contact Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, sqlx::Type, Display)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContactStatus {
    New,
    Contacted,
    Closed,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateContactDto {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message must be 1–5000 characters"))]
    pub message: String,
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsDto {
    pub total_pages: i64,
    pub total_blogs: i64,
    pub total_keywords: i64,
    pub recent_updates: Vec<String>,
}
