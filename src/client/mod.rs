//! Typed client for the `/api` surface, used by the admin managers and the
//! public views.

mod token;

pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};

use std::sync::Arc;

use reqwest::{multipart, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::{
    AdminCredentials, AnalyticsDto, Blog, ContactSubmission, CreateBlogDto, CreateContactDto,
    CreateKeywordDto, CurrentLogo, Keyword, Logo, LogoUploadResponse, MessageResponse, RobotsTxt,
    RobotsTxtContent, SeoSettings, SeoSettingsDto, SitePage, TokenResponse, UpdateBlogDto,
};

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered 401; the stored token is missing or stale.
    #[error("Not authenticated")]
    Unauthorized,

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl ClientError {
    /// The message worth showing a user.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// `backend_url` is the server origin, e.g. `https://techresona.com`;
    /// requests go to `{backend_url}/api/...`.
    pub fn new(backend_url: &str, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        Url::parse(backend_url)?;
        Ok(ApiClient {
            http: reqwest::Client::new(),
            api_base: format!("{}/api", backend_url.trim_end_matches('/')),
            tokens,
        })
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.get().is_some()
    }

    // ── Plumbing ──────────────────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.api_base));
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(method, path).json(body)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)).await
    }

    // ── Auth ──────────────────────────────────────────────────────────────

    /// Log in and persist the returned token.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        let creds = AdminCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token: TokenResponse = self
            .send(self.http.post(format!("{}/auth/login", self.api_base)).json(&creds))
            .await?;
        self.tokens.set(&token.access_token)
    }

    /// Register an admin and persist the returned token.
    pub async fn register(&self, email: &str, password: &str) -> ClientResult<()> {
        let creds = AdminCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token: TokenResponse = self
            .send(self.http.post(format!("{}/auth/register", self.api_base)).json(&creds))
            .await?;
        self.tokens.set(&token.access_token)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.tokens.clear()
    }

    // ── Blogs ─────────────────────────────────────────────────────────────

    pub async fn list_blogs(&self, published_only: bool) -> ClientResult<Vec<Blog>> {
        self.get(&format!("/blogs?published_only={published_only}"))
            .await
    }

    pub async fn get_blog(&self, slug: &str) -> ClientResult<Blog> {
        self.get(&format!("/blogs/{}", urlencoding::encode(slug)))
            .await
    }

    pub async fn create_blog(&self, blog: &CreateBlogDto) -> ClientResult<Blog> {
        self.send_json(Method::POST, "/blogs", blog).await
    }

    pub async fn update_blog(&self, slug: &str, update: &UpdateBlogDto) -> ClientResult<Blog> {
        let path = format!("/blogs/{}", urlencoding::encode(slug));
        self.send_json(Method::PUT, &path, update).await
    }

    pub async fn delete_blog(&self, slug: &str) -> ClientResult<MessageResponse> {
        let path = format!("/blogs/{}", urlencoding::encode(slug));
        self.send(self.request(Method::DELETE, &path)).await
    }

    // ── SEO ───────────────────────────────────────────────────────────────

    pub async fn list_seo(&self) -> ClientResult<Vec<SeoSettings>> {
        self.get("/seo").await
    }

    pub async fn get_seo(&self, page: SitePage) -> ClientResult<SeoSettings> {
        self.get(&format!("/seo/{page}")).await
    }

    pub async fn create_seo(&self, settings: &SeoSettingsDto) -> ClientResult<SeoSettings> {
        self.send_json(Method::POST, "/seo", settings).await
    }

    pub async fn save_seo(
        &self,
        page: SitePage,
        settings: &SeoSettingsDto,
    ) -> ClientResult<SeoSettings> {
        self.send_json(Method::PUT, &format!("/seo/{page}"), settings)
            .await
    }

    pub async fn get_robots_txt(&self) -> ClientResult<String> {
        let robots: RobotsTxtContent = self.get("/robots-txt").await?;
        Ok(robots.content)
    }

    pub async fn save_robots_txt(&self, content: &str) -> ClientResult<RobotsTxt> {
        let body = RobotsTxtContent {
            content: content.to_string(),
        };
        self.send_json(Method::PUT, "/robots-txt", &body).await
    }

    pub async fn generate_sitemap(&self) -> ClientResult<String> {
        let response = check(self.request(Method::GET, "/sitemap/generate").send().await?).await?;
        Ok(response.text().await?)
    }

    // ── Keywords ──────────────────────────────────────────────────────────

    pub async fn list_keywords(&self) -> ClientResult<Vec<Keyword>> {
        self.get("/keywords").await
    }

    pub async fn create_keyword(&self, keyword: &CreateKeywordDto) -> ClientResult<Keyword> {
        self.send_json(Method::POST, "/keywords", keyword).await
    }

    pub async fn delete_keyword(&self, id: &str) -> ClientResult<MessageResponse> {
        let path = format!("/keywords/{}", urlencoding::encode(id));
        self.send(self.request(Method::DELETE, &path)).await
    }

    // ── Logo ──────────────────────────────────────────────────────────────

    pub async fn current_logo(&self) -> ClientResult<CurrentLogo> {
        self.get("/logo/current").await
    }

    pub async fn logo_history(&self) -> ClientResult<Vec<Logo>> {
        self.get("/logo/history").await
    }

    pub async fn upload_logo(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> ClientResult<LogoUploadResponse> {
        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("file", part);
        self.send(self.request(Method::POST, "/logo/upload").multipart(form))
            .await
    }

    // ── Contact + dashboard ───────────────────────────────────────────────

    pub async fn submit_contact(&self, contact: &CreateContactDto) -> ClientResult<ContactSubmission> {
        self.send(
            self.http
                .post(format!("{}/contact/submit", self.api_base))
                .json(contact),
        )
        .await
    }

    pub async fn list_contact_submissions(&self) -> ClientResult<Vec<ContactSubmission>> {
        self.get("/contact/submissions").await
    }

    pub async fn analytics(&self) -> ClientResult<AnalyticsDto> {
        self.get("/analytics").await
    }
}

/// Turn non-2xx responses into `ClientError`, pulling the server's
/// `{"error": ...}` message when there is one.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["error"].as_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    tracing::debug!(status = status.as_u16(), %message, "API request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
