use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::shared::{
    ensure_not_blank, fetch_blog, is_valid_slug, validation_message, BLOG_COLUMNS,
};
use crate::{
    auth::AuthAdmin,
    error::{AppError, AppResult},
    models::{Blog, BlogListQuery, CreateBlogDto, MessageResponse, UpdateBlogDto, DEFAULT_AUTHOR},
    state::AppState,
};

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/blogs?published_only=bool: newest first. Drafts are only listed
/// when `published_only=false`.
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> AppResult<Json<Vec<Blog>>> {
    let filter = if query.published_only {
        "WHERE published = 1"
    } else {
        ""
    };

    let blogs = sqlx::query_as::<_, Blog>(&format!(
        "SELECT {BLOG_COLUMNS} FROM blogs {filter}
         ORDER BY created_at DESC, rowid DESC
         LIMIT 1000"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(blogs))
}

/// GET /api/blogs/:slug
pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Blog>> {
    Ok(Json(fetch_blog(&state.pool, &slug).await?))
}

/// POST /api/blogs: create a post. The slug must be unique.
pub async fn create_blog(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(req): Json<CreateBlogDto>,
) -> AppResult<(StatusCode, Json<Blog>)> {
    req.validate().map_err(validation_message)?;
    check_required_text(Some(&req.title), Some(&req.excerpt), Some(&req.content))?;

    if !is_valid_slug(&req.slug) {
        return Err(AppError::Validation(
            "Slug may only contain lowercase letters, digits and single hyphens".into(),
        ));
    }

    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM blogs WHERE slug = ?")
        .bind(&req.slug)
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Blog with this slug already exists".into(),
        ));
    }

    let now = Utc::now();
    let author = req
        .author
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

    let blog = sqlx::query_as::<_, Blog>(&format!(
        "INSERT INTO blogs (id, slug, title, excerpt, content, keywords, meta_description,
                            author, published, featured_image, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {BLOG_COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(&req.slug)
    .bind(&req.title)
    .bind(&req.excerpt)
    .bind(&req.content)
    .bind(&req.keywords)
    .bind(&req.meta_description)
    .bind(&author)
    .bind(req.published.unwrap_or(true))
    .bind(req.featured_image.filter(|s| !s.trim().is_empty()))
    .bind(now)
    .bind(now)
    .fetch_one(&state.pool)
    .await?;

    info!(slug = %blog.slug, admin = %admin.email, "Blog created");
    Ok((StatusCode::CREATED, Json(blog)))
}

/// Title, excerpt and content may be omitted on update but never blank.
fn check_required_text(
    title: Option<&str>,
    excerpt: Option<&str>,
    content: Option<&str>,
) -> AppResult<()> {
    ensure_not_blank("Title", title)?;
    ensure_not_blank("Excerpt", excerpt)?;
    ensure_not_blank("Content", content)
}

/// PUT /api/blogs/:slug: partial update; the slug itself never changes.
pub async fn update_blog(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Path(slug): Path<String>,
    Json(req): Json<UpdateBlogDto>,
) -> AppResult<Json<Blog>> {
    check_required_text(
        req.title.as_deref(),
        req.excerpt.as_deref(),
        req.content.as_deref(),
    )?;

    fetch_blog(&state.pool, &slug).await?;

    // Absent keeps the current image; a blank string clears it.
    let replace_image = req.featured_image.is_some();
    let featured_image = req.featured_image.filter(|s| !s.trim().is_empty());

    let blog = sqlx::query_as::<_, Blog>(&format!(
        "UPDATE blogs SET
             title            = COALESCE(?, title),
             excerpt          = COALESCE(?, excerpt),
             content          = COALESCE(?, content),
             keywords         = COALESCE(?, keywords),
             meta_description = COALESCE(?, meta_description),
             published        = COALESCE(?, published),
             featured_image   = CASE WHEN ? THEN ? ELSE featured_image END,
             updated_at       = ?
         WHERE slug = ?
         RETURNING {BLOG_COLUMNS}"
    ))
    .bind(req.title)
    .bind(req.excerpt)
    .bind(req.content)
    .bind(req.keywords)
    .bind(req.meta_description)
    .bind(req.published)
    .bind(replace_image)
    .bind(featured_image)
    .bind(Utc::now())
    .bind(&slug)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    info!(slug = %slug, admin = %admin.email, "Blog updated");
    Ok(Json(blog))
}

/// DELETE /api/blogs/:slug
pub async fn delete_blog(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Path(slug): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let result = sqlx::query("DELETE FROM blogs WHERE slug = ?")
        .bind(&slug)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Blog not found".into()));
    }

    info!(slug = %slug, admin = %admin.email, "Blog deleted");
    Ok(Json(MessageResponse {
        message: "Blog deleted successfully".into(),
    }))
}
