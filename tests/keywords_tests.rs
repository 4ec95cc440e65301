mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn tracked_keywords_are_listed_in_order() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool);
    let token = common::register_and_get_token(app.clone()).await;

    let (status, first) = common::post_json_authed(
        app.clone(),
        "/api/keywords",
        &token,
        json!({
            "keyword": "  azure consulting  ",
            "page": "services",
            "ranking": 4,
            "search_volume": 1200,
            "difficulty": "High"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {first}");
    assert_eq!(first["keyword"], "azure consulting");
    assert_eq!(first["difficulty"], "High");
    assert!(first["tracked_at"].is_string());

    let (status, second) = common::post_json_authed(
        app.clone(),
        "/api/keywords",
        &token,
        json!({ "keyword": "cloud blog", "page": "blog" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {second}");
    assert!(second["ranking"].is_null());
    assert!(second["difficulty"].is_null());

    let (status, list) = common::get_authed(app, "/api/keywords", &token).await;
    assert_eq!(status, StatusCode::OK);
    let keywords: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k["keyword"].as_str().unwrap())
        .collect();
    assert_eq!(keywords, ["azure consulting", "cloud blog"]);
}

#[tokio::test]
async fn invalid_keywords_are_rejected() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool);
    let token = common::register_and_get_token(app.clone()).await;

    let cases = [
        json!({ "keyword": "   ", "page": "home" }),
        json!({ "keyword": "aws", "page": "home", "ranking": 0 }),
        json!({ "keyword": "aws", "page": "home", "search_volume": -5 }),
    ];
    for body in cases {
        let (status, resp) =
            common::post_json_authed(app.clone(), "/api/keywords", &token, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {resp}");
    }

    // Unknown page or difficulty fails JSON deserialization.
    let (status, _) = common::post_json_authed(
        app.clone(),
        "/api/keywords",
        &token,
        json!({ "keyword": "aws", "page": "pricing" }),
    )
    .await;
    assert!(status.is_client_error());

    let (_, list) = common::get_authed(app, "/api/keywords", &token).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_keyword() {
    let pool = common::test_pool().await;
    let app = common::create_test_app(pool);
    let token = common::register_and_get_token(app.clone()).await;

    let (_, created) = common::post_json_authed(
        app.clone(),
        "/api/keywords",
        &token,
        json!({ "keyword": "seo audit", "page": "home", "difficulty": "Low" }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) =
        common::delete_authed(app.clone(), &format!("/api/keywords/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Keyword deleted successfully");

    let (status, body) =
        common::delete_authed(app.clone(), &format!("/api/keywords/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Keyword not found");

    let (_, list) = common::get_authed(app, "/api/keywords", &token).await;
    assert!(list.as_array().unwrap().is_empty());
}
