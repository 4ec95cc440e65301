// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

use techresona_server::{db, routes, state::AppState};

pub const TEST_JWT_SECRET: &str = "test-secret-min-32-characters-long!!";
pub const TEST_PASSWORD: &str = "password123";
pub const SITE_BASE_URL: &str = "https://preview.techresona.test";
pub const PUBLIC_SITE_URL: &str = "https://techresona.com";

/// A fresh public directory per test so logo uploads never collide.
pub fn test_public_dir() -> PathBuf {
    std::env::temp_dir()
        .join("techresona_test_public")
        .join(uuid::Uuid::new_v4().simple().to_string())
}

/// A private in-memory database with all migrations applied.
///
/// The pool is pinned to one connection that never expires, since every
/// SQLite in-memory connection is its own database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState {
        pool,
        jwt_secret: Arc::from(TEST_JWT_SECRET),
        public_dir: test_public_dir(),
        site_base_url: Arc::from(SITE_BASE_URL),
        public_site_url: Arc::from(PUBLIC_SITE_URL),
        slack_webhook_url: None,
        smtp: None,
        http_client: reqwest::Client::new(),
    }
}

/// Build the full application router backed by `pool`.
///
/// Each call gets its own public directory; clone the returned router when a
/// test needs uploads to stay visible across requests.
pub fn create_test_app(pool: SqlitePool) -> Router {
    routes::app(test_state(pool))
}

/// Serve the application on an ephemeral local port and return its origin.
pub async fn spawn_server() -> String {
    let app = create_test_app(test_pool().await);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Generate an admin email that is unique per test invocation.
pub fn unique_email() -> String {
    format!(
        "admin-{}@techresona.test",
        &uuid::Uuid::new_v4().simple().to_string()[..12]
    )
}

// ── Request helpers ──────────────────────────────────────────────────────────

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_authed(
    app: Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, request(Method::PUT, uri, None, Some(body))).await
}

pub async fn put_json_authed(
    app: Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn get_no_auth(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_authed(app: Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn delete_authed(app: Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

pub async fn delete_no_auth(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, request(Method::DELETE, uri, None, None)).await
}

/// GET returning the raw body and its Content-Type, for XML and text routes.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .oneshot(request(Method::GET, uri, None, None))
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Scenario helpers ─────────────────────────────────────────────────────────

/// Register a fresh admin and return their access token.
pub async fn register_and_get_token(app: Router) -> String {
    let (status, body) = post_json(
        app,
        "/api/auth/register",
        serde_json::json!({ "email": unique_email(), "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "setup register failed: {body}");
    body["access_token"].as_str().unwrap().to_owned()
}

pub fn blog_body(slug: &str, published: bool) -> Value {
    serde_json::json!({
        "slug": slug,
        "title": format!("Post {slug}"),
        "excerpt": "A short summary.",
        "content": "<p>Full article body.</p>",
        "keywords": "cloud, azure",
        "meta_description": "Meta description.",
        "published": published,
    })
}

/// Create a blog post and return the full response body.
pub async fn create_blog(app: Router, token: &str, slug: &str, published: bool) -> Value {
    let (status, body) =
        post_json_authed(app, "/api/blogs", token, blog_body(slug, published)).await;
    assert_eq!(status, StatusCode::CREATED, "setup create_blog failed: {body}");
    body
}

// ── Multipart helpers ─────────────────────────────────────────────────────────

/// Smallest byte sequence `infer` recognises as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

/// Build a single-file `multipart/form-data` body.
///
/// Returns `(body_bytes, content_type_header_value)` where the content-type
/// includes the boundary parameter.
pub fn build_multipart(
    field_name: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> (Vec<u8>, String) {
    let boundary = "----TechResonaTestBoundary1234567890";
    let mut body: Vec<u8> = Vec::new();

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    (body, format!("multipart/form-data; boundary={boundary}"))
}

/// POST a single-file multipart upload, optionally authenticated.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    token: Option<&str>,
    field_name: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> (StatusCode, Value) {
    let (body_bytes, content_type) = build_multipart(field_name, filename, content_type, data);
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body_bytes)).unwrap()).await
}
