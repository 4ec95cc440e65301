mod common;

use std::sync::Arc;

use techresona_server::{
    admin::{BlogManager, FormError, KeywordTracker, LogoManager, Navigation, Notice, SeoManager},
    client::{ApiClient, ClientError, MemoryTokenStore, TokenStore},
    models::{CreateContactDto, Difficulty, SitePage},
    site::{BlogListPage, FALLBACK_BLOG_TITLE},
};

/// A client for `base` holding a freshly registered admin's token.
async fn logged_in_client(base: &str) -> ApiClient {
    let client = ApiClient::new(base, Arc::new(MemoryTokenStore::new())).unwrap();
    client
        .register(&common::unique_email(), common::TEST_PASSWORD)
        .await
        .unwrap();
    assert!(client.is_logged_in());
    client
}

fn anonymous_client(base: &str) -> ApiClient {
    ApiClient::new(base, Arc::new(MemoryTokenStore::new())).unwrap()
}

// ============================================================================
// ApiClient
// ============================================================================

#[tokio::test]
async fn login_stores_the_token_and_logout_clears_it() {
    let base = common::spawn_server().await;
    let email = common::unique_email();

    let client = anonymous_client(&base);
    client.register(&email, common::TEST_PASSWORD).await.unwrap();
    client.logout().unwrap();
    assert!(!client.is_logged_in());

    let err = client.login(&email, "wrongpassword1").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized), "{err:?}");
    assert!(!client.is_logged_in());

    client.login(&email, common::TEST_PASSWORD).await.unwrap();
    assert!(client.tokens().get().is_some());
}

#[tokio::test]
async fn api_errors_carry_the_server_message() {
    let base = common::spawn_server().await;
    let client = anonymous_client(&base);

    let err = client.get_blog("missing-post").await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Blog not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn contact_form_round_trip() {
    let base = common::spawn_server().await;
    let visitor = anonymous_client(&base);

    let submission = visitor
        .submit_contact(&CreateContactDto {
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            company: Some("Navy".into()),
            phone: None,
            message: "Tell me about your DevOps services.".into(),
        })
        .await
        .unwrap();

    let admin = logged_in_client(&base).await;
    let inbox = admin.list_contact_submissions().await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, submission.id);

    let stats = admin.analytics().await.unwrap();
    assert_eq!(stats.total_blogs, 0);
}

// ============================================================================
// BlogManager
// ============================================================================

#[tokio::test]
async fn blog_manager_create_edit_delete() {
    let base = common::spawn_server().await;
    let client = logged_in_client(&base).await;
    let mut manager = BlogManager::new(client);

    assert_eq!(manager.mount().await, Navigation::Stay);
    assert!(!manager.loading);
    assert!(manager.blogs.is_empty());

    manager.open_new();
    manager.form.slug = "kubernetes-on-azure".into();
    manager.form.title = "Kubernetes on Azure".into();
    manager.form.excerpt = "AKS in practice.".into();
    manager.form.content = "<p>Details.</p>".into();
    manager.form.published = false;
    assert_eq!(manager.save().await, Navigation::Stay);
    assert_eq!(
        manager.notices.last(),
        Some(&Notice::Success("Blog created successfully".into()))
    );
    assert!(!manager.dialog_open);
    // Drafts are part of the admin listing.
    assert_eq!(manager.blogs.len(), 1);
    assert_eq!(manager.blogs[0].author, "TechResona Team");

    assert!(manager.open_edit("kubernetes-on-azure"));
    assert_eq!(manager.editing.as_deref(), Some("kubernetes-on-azure"));
    manager.form.title = "Running Kubernetes on Azure".into();
    manager.form.published = true;
    assert_eq!(manager.save().await, Navigation::Stay);
    assert_eq!(manager.blogs[0].title, "Running Kubernetes on Azure");
    assert!(manager.blogs[0].published);

    assert_eq!(manager.delete("kubernetes-on-azure").await, Navigation::Stay);
    assert!(manager.blogs.is_empty());
    assert_eq!(
        manager.notices.last(),
        Some(&Notice::Success("Blog deleted successfully".into()))
    );
}

#[tokio::test]
async fn blog_manager_reports_conflicts_and_missing_fields() {
    let base = common::spawn_server().await;
    let client = logged_in_client(&base).await;
    let mut manager = BlogManager::new(client);
    manager.mount().await;

    manager.open_new();
    manager.form.slug = "only-a-slug".into();
    assert_eq!(manager.save().await, Navigation::Stay);
    assert!(matches!(manager.notices.last(), Some(Notice::Error(_))));
    assert!(manager.blogs.is_empty());

    for _ in 0..2 {
        manager.open_new();
        manager.form.slug = "twice".into();
        manager.form.title = "Twice".into();
        manager.form.excerpt = "Twice.".into();
        manager.form.content = "Twice.".into();
        manager.save().await;
    }
    assert_eq!(
        manager.notices.last(),
        Some(&Notice::Error("Blog with this slug already exists".into()))
    );
    assert_eq!(manager.blogs.len(), 1);
}

#[tokio::test]
async fn blog_manager_clears_a_featured_image() {
    let base = common::spawn_server().await;
    let client = logged_in_client(&base).await;
    let mut manager = BlogManager::new(client);
    manager.mount().await;

    manager.open_new();
    manager.form.slug = "illustrated".into();
    manager.form.title = "Illustrated".into();
    manager.form.excerpt = "With a picture.".into();
    manager.form.content = "Body.".into();
    manager.form.featured_image = "https://cdn.example.com/a.png".into();
    manager.save().await;
    assert_eq!(
        manager.blogs[0].featured_image.as_deref(),
        Some("https://cdn.example.com/a.png")
    );

    assert!(manager.open_edit("illustrated"));
    manager.form.featured_image = String::new();
    assert_eq!(manager.save().await, Navigation::Stay);
    assert_eq!(
        manager.notices.last(),
        Some(&Notice::Success("Blog updated successfully".into()))
    );
    assert!(manager.blogs[0].featured_image.is_none());
}

#[tokio::test]
async fn blog_manager_refuses_to_change_the_author() {
    let base = common::spawn_server().await;
    let client = logged_in_client(&base).await;
    let mut manager = BlogManager::new(client);
    manager.mount().await;

    manager.open_new();
    assert!(manager.author_editable());
    manager.form.slug = "bylined".into();
    manager.form.title = "Bylined".into();
    manager.form.excerpt = "Who wrote this?".into();
    manager.form.content = "Body.".into();
    manager.form.author = "Jane Doe".into();
    manager.save().await;
    assert_eq!(manager.blogs[0].author, "Jane Doe");

    assert!(manager.open_edit("bylined"));
    assert!(!manager.author_editable());
    manager.form.author = "Someone Else".into();
    manager.form.title = "Bylined, edited".into();
    assert_eq!(manager.save().await, Navigation::Stay);
    assert_eq!(
        manager.notices.last(),
        Some(&Notice::Error(
            "The author cannot be changed after a post is created".into()
        ))
    );
    assert!(manager.dialog_open, "dialog stays open for correction");

    manager.refresh().await;
    assert_eq!(manager.blogs[0].author, "Jane Doe");
    assert_eq!(manager.blogs[0].title, "Bylined");
}

#[tokio::test]
async fn stale_token_sends_the_manager_to_login() {
    let base = common::spawn_server().await;
    let tokens = Arc::new(MemoryTokenStore::with_token("stale.token.value"));
    let client = ApiClient::new(&base, tokens.clone()).unwrap();
    let mut manager = BlogManager::new(client);

    manager.open_new();
    manager.form.slug = "never-saved".into();
    manager.form.title = "Never".into();
    manager.form.excerpt = "Never.".into();
    manager.form.content = "Never.".into();

    assert_eq!(manager.save().await, Navigation::Login);
    assert!(tokens.get().is_none(), "token must be cleared");
    assert!(manager.notices.drain().is_empty(), "no toast on 401");
}

// ============================================================================
// SeoManager
// ============================================================================

#[tokio::test]
async fn seo_manager_saves_and_prefills_pages() {
    let base = common::spawn_server().await;
    let client = logged_in_client(&base).await;
    let mut manager = SeoManager::new(client);

    assert_eq!(manager.mount().await, Navigation::Stay);
    assert!(manager.robots_txt.contains("Sitemap:"));

    manager.select_page(SitePage::About);
    manager.form.title = "About TechResona".into();
    manager.form.json_ld = r#"{ "@type": "AboutPage" }"#.into();
    assert_eq!(manager.save().await, Ok(Navigation::Stay));
    assert_eq!(manager.settings.len(), 1);

    manager.select_page(SitePage::Home);
    assert_eq!(manager.form.title, "");

    manager.select_page(SitePage::About);
    assert_eq!(manager.form.title, "About TechResona");
    assert!(manager.form.json_ld.contains("AboutPage"));

    manager.robots_txt = "User-agent: *\nDisallow: /".into();
    assert_eq!(manager.save_robots().await, Navigation::Stay);

    assert_eq!(manager.generate_sitemap().await, Navigation::Stay);
    assert!(manager.sitemap.as_deref().unwrap().contains("<urlset"));
}

#[tokio::test]
async fn seo_manager_keeps_the_form_on_invalid_json_ld() {
    let base = common::spawn_server().await;
    let client = logged_in_client(&base).await;
    let mut manager = SeoManager::new(client.clone());
    manager.mount().await;

    manager.select_page(SitePage::Services);
    manager.form.title = "Services".into();
    manager.form.json_ld = "{ not json".into();
    let typed = manager.form.clone();

    let result = manager.save().await;
    assert!(matches!(result, Err(FormError::InvalidJsonLd(_))), "{result:?}");
    assert_eq!(manager.form, typed);
    assert!(matches!(manager.notices.last(), Some(Notice::Error(_))));

    // Nothing reached the server.
    assert!(client.list_seo().await.unwrap().is_empty());
}

// ============================================================================
// KeywordTracker
// ============================================================================

#[tokio::test]
async fn keyword_tracker_add_and_delete() {
    let base = common::spawn_server().await;
    let client = logged_in_client(&base).await;
    let mut tracker = KeywordTracker::new(client);
    assert_eq!(tracker.mount().await, Navigation::Stay);

    tracker.open_dialog();
    tracker.form.keyword = "cloud migration".into();
    tracker.form.page = Some(SitePage::Services);
    tracker.form.ranking = "7".into();
    tracker.form.difficulty = Some(Difficulty::Medium);
    assert_eq!(tracker.add().await, Ok(Navigation::Stay));
    assert!(!tracker.dialog_open);
    assert_eq!(tracker.form.keyword, "");
    assert_eq!(tracker.keywords.len(), 1);
    assert_eq!(tracker.keywords[0].ranking, Some(7));

    tracker.form.keyword = "aws".into();
    let result = tracker.add().await;
    assert!(matches!(result, Err(FormError::MissingFields(_))));
    assert_eq!(tracker.form.keyword, "aws", "form survives a local error");

    let id = tracker.keywords[0].id.clone();
    assert_eq!(tracker.delete(&id).await, Navigation::Stay);
    assert!(tracker.keywords.is_empty());
}

// ============================================================================
// LogoManager
// ============================================================================

#[tokio::test]
async fn logo_manager_requires_login() {
    let base = common::spawn_server().await;
    let mut manager = LogoManager::new(anonymous_client(&base));
    assert_eq!(manager.mount().await, Navigation::Login);
}

#[tokio::test]
async fn logo_manager_validates_and_uploads() {
    let base = common::spawn_server().await;
    let client = logged_in_client(&base).await;
    let mut manager = LogoManager::new(client);

    assert_eq!(manager.mount().await, Navigation::Stay);
    assert_eq!(manager.current.as_ref().unwrap().filename, "logo.png");
    assert!(manager.history.is_empty());

    assert_eq!(
        manager.select_file("notes.txt", "text/plain", b"hello".to_vec()),
        Err(FormError::NotAnImage)
    );
    assert_eq!(
        manager.select_file("huge.png", "image/png", vec![0; 5 * 1024 * 1024 + 1]),
        Err(FormError::FileTooLarge)
    );
    assert!(manager.selected.is_none());

    assert!(matches!(
        manager.upload().await,
        Err(FormError::MissingFields(_))
    ));

    manager
        .select_file("new-logo.png", "image/png", common::PNG_BYTES.to_vec())
        .unwrap();
    assert_eq!(manager.upload().await, Ok(Navigation::Stay));
    assert!(manager.selected.is_none());
    assert_eq!(manager.current.as_ref().unwrap().filename, "new-logo.png");
    assert_eq!(manager.history.len(), 1);
}

// ============================================================================
// Public blog listing
// ============================================================================

#[tokio::test]
async fn blog_list_page_shows_published_posts_with_fallback_meta() {
    let base = common::spawn_server().await;
    let admin = logged_in_client(&base).await;
    let mut manager = BlogManager::new(admin);

    for (slug, published) in [("public-post", true), ("hidden-draft", false)] {
        manager.open_new();
        manager.form.slug = slug.into();
        manager.form.title = slug.into();
        manager.form.excerpt = "Excerpt".into();
        manager.form.content = "Body".into();
        manager.form.published = published;
        manager.save().await;
    }

    let page = BlogListPage::load(&anonymous_client(&base)).await;
    assert_eq!(page.meta.title, FALLBACK_BLOG_TITLE);
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.posts[0].href, "/blog/public-post");
    assert_eq!(page.posts[0].author, "TechResona Team");
}
