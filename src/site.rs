//! Read-only views of published content.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    client::{ApiClient, ClientError},
    models::{Blog, SeoSettings, SitePage},
};

pub const FALLBACK_BLOG_TITLE: &str =
    "TechResona Blog - Cloud Solutions, SEO & Web Development Insights";
pub const FALLBACK_BLOG_DESCRIPTION: &str = "Read expert insights on cloud migration, Azure, AWS, \
     SEO optimization, and web development trends from TechResona's team of specialists.";
pub const FALLBACK_BLOG_KEYWORDS: &str = "cloud blog, azure tips, aws best practices, seo guides, \
     web development blog, tech insights";

/// Head metadata for a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub json_ld: Option<Value>,
}

impl PageMeta {
    /// Saved SEO fields win; anything unset falls back to the defaults.
    pub fn for_blog(seo: Option<&SeoSettings>) -> Self {
        let pick = |value: Option<&String>, fallback: &str| {
            value
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        PageMeta {
            title: pick(seo.and_then(|s| s.title.as_ref()), FALLBACK_BLOG_TITLE),
            description: pick(
                seo.and_then(|s| s.description.as_ref()),
                FALLBACK_BLOG_DESCRIPTION,
            ),
            keywords: pick(seo.and_then(|s| s.keywords.as_ref()), FALLBACK_BLOG_KEYWORDS),
            json_ld: seo.and_then(|s| s.json_ld.as_ref()).map(|j| j.0.clone()),
        }
    }
}

/// One post in the listing grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogCard {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub date: String,
    pub featured_image: Option<String>,
}

impl From<&Blog> for BlogCard {
    fn from(blog: &Blog) -> Self {
        BlogCard {
            href: format!("/blog/{}", blog.slug),
            title: blog.title.clone(),
            excerpt: blog.excerpt.clone(),
            author: blog.author.clone(),
            date: format_date(&blog.created_at),
            featured_image: blog.featured_image.clone(),
        }
    }
}

/// `March 9, 2025`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// The public `/blog` page.
#[derive(Debug, Clone)]
pub struct BlogListPage {
    pub meta: PageMeta,
    pub posts: Vec<BlogCard>,
}

impl BlogListPage {
    /// Fetch published posts and the `blog` SEO entry. A missing SEO entry
    /// or a failed post fetch still renders the page.
    pub async fn load(client: &ApiClient) -> Self {
        let seo = match client.get_seo(SitePage::Blog).await {
            Ok(seo) => Some(seo),
            Err(ClientError::Api { status: 404, .. }) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load blog SEO entry");
                None
            }
        };

        let posts = match client.list_blogs(true).await {
            Ok(blogs) => blogs.iter().map(BlogCard::from).collect(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load blogs");
                Vec::new()
            }
        };

        BlogListPage {
            meta: PageMeta::for_blog(seo.as_ref()),
            posts,
        }
    }
}
