//! XML sitemap and robots.txt rendering.

use chrono::{DateTime, Utc};

/// Served by `/robots.txt` when no custom content has been saved.
pub const DEFAULT_ROBOTS_TXT: &str = "User-agent: *
Allow: /
Disallow: /admin/
Disallow: /api/

# Crawl-delay
Crawl-delay: 1

# Sitemap
Sitemap: https://techresona.com/sitemap.xml";

/// Default for `/api/robots-txt`, pointing the sitemap at `base_url`.
pub fn default_api_robots_txt(base_url: &str) -> String {
    format!("User-agent: *\nAllow: /\nSitemap: {base_url}/sitemap.xml")
}

struct StaticPage {
    loc: &'static str,
    priority: &'static str,
    changefreq: &'static str,
}

const STATIC_PAGES: &[StaticPage] = &[
    StaticPage { loc: "/", priority: "1.0", changefreq: "weekly" },
    StaticPage { loc: "/about", priority: "0.8", changefreq: "monthly" },
    StaticPage { loc: "/services", priority: "0.9", changefreq: "weekly" },
    StaticPage { loc: "/contact", priority: "0.7", changefreq: "monthly" },
    StaticPage { loc: "/blog", priority: "0.8", changefreq: "daily" },
];

/// A published post as it appears in the sitemap.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SitemapEntry {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

/// Render a `urlset` document: the static pages first, then one entry per
/// post in the order given.
pub fn build_sitemap(base_url: &str, posts: &[SitemapEntry]) -> String {
    let base = escape_xml(base_url.trim_end_matches('/'));
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for page in STATIC_PAGES {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{base}{}</loc>\n", page.loc));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", page.changefreq));
        xml.push_str(&format!("    <priority>{}</priority>\n", page.priority));
        xml.push_str("  </url>\n");
    }

    for post in posts {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{base}/blog/{}</loc>\n",
            escape_xml(&post.slug)
        ));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            post.updated_at.format("%Y-%m-%d")
        ));
        xml.push_str("    <changefreq>monthly</changefreq>\n");
        xml.push_str("    <priority>0.6</priority>\n");
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>");
    xml
}

pub(crate) fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
