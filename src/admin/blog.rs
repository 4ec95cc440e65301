use super::{handle_failure, Navigation, Notices};
use crate::{
    client::ApiClient,
    models::{Blog, CreateBlogDto, UpdateBlogDto, DEFAULT_AUTHOR},
};

/// The blog editor dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogForm {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub keywords: String,
    pub meta_description: String,
    pub author: String,
    pub featured_image: String,
    pub published: bool,
}

impl Default for BlogForm {
    fn default() -> Self {
        BlogForm {
            slug: String::new(),
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            keywords: String::new(),
            meta_description: String::new(),
            author: DEFAULT_AUTHOR.to_string(),
            featured_image: String::new(),
            published: true,
        }
    }
}

impl From<&Blog> for BlogForm {
    fn from(blog: &Blog) -> Self {
        BlogForm {
            slug: blog.slug.clone(),
            title: blog.title.clone(),
            excerpt: blog.excerpt.clone(),
            content: blog.content.clone(),
            keywords: blog.keywords.clone(),
            meta_description: blog.meta_description.clone(),
            author: blog.author.clone(),
            featured_image: blog.featured_image.clone().unwrap_or_default(),
            published: blog.published,
        }
    }
}

impl BlogForm {
    fn has_required_fields(&self) -> bool {
        [&self.slug, &self.title, &self.excerpt, &self.content]
            .iter()
            .all(|f| !f.trim().is_empty())
    }

    fn featured_image(&self) -> Option<String> {
        Some(self.featured_image.trim().to_string()).filter(|s| !s.is_empty())
    }

    fn to_create(&self) -> CreateBlogDto {
        CreateBlogDto {
            slug: self.slug.trim().to_string(),
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            keywords: self.keywords.clone(),
            meta_description: self.meta_description.clone(),
            author: Some(self.author.clone()),
            published: Some(self.published),
            featured_image: self.featured_image(),
        }
    }

    fn to_update(&self) -> UpdateBlogDto {
        UpdateBlogDto {
            title: Some(self.title.clone()),
            excerpt: Some(self.excerpt.clone()),
            content: Some(self.content.clone()),
            keywords: Some(self.keywords.clone()),
            meta_description: Some(self.meta_description.clone()),
            published: Some(self.published),
            // Always sent so that emptying the field clears the image.
            featured_image: Some(self.featured_image.trim().to_string()),
        }
    }
}

pub struct BlogManager {
    client: ApiClient,
    pub blogs: Vec<Blog>,
    pub form: BlogForm,
    /// Slug of the post being edited; `None` while composing a new one.
    pub editing: Option<String>,
    pub dialog_open: bool,
    pub loading: bool,
    pub notices: Notices,
}

impl BlogManager {
    pub fn new(client: ApiClient) -> Self {
        BlogManager {
            client,
            blogs: Vec::new(),
            form: BlogForm::default(),
            editing: None,
            dialog_open: false,
            loading: true,
            notices: Notices::default(),
        }
    }

    pub async fn mount(&mut self) -> Navigation {
        self.refresh().await
    }

    /// Reload every post, drafts included.
    pub async fn refresh(&mut self) -> Navigation {
        let result = self.client.list_blogs(false).await;
        self.loading = false;
        match result {
            Ok(blogs) => {
                self.blogs = blogs;
                Navigation::Stay
            }
            Err(e) => handle_failure(&self.client, &mut self.notices, e, "Failed to load blogs"),
        }
    }

    pub fn open_new(&mut self) {
        self.editing = None;
        self.form = BlogForm::default();
        self.dialog_open = true;
    }

    /// Load `slug` into the form. Returns false if it is not in the list.
    pub fn open_edit(&mut self, slug: &str) -> bool {
        let Some(blog) = self.blogs.iter().find(|b| b.slug == slug) else {
            return false;
        };
        self.form = BlogForm::from(blog);
        self.editing = Some(blog.slug.clone());
        self.dialog_open = true;
        true
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    /// The author is fixed once a post exists; only new posts take one.
    pub fn author_editable(&self) -> bool {
        self.editing.is_none()
    }

    /// Create or update depending on how the dialog was opened.
    pub async fn save(&mut self) -> Navigation {
        if !self.form.has_required_fields() {
            self.notices
                .error("Slug, title, excerpt and content are required");
            return Navigation::Stay;
        }

        if let Some(slug) = &self.editing {
            let author_changed = self
                .blogs
                .iter()
                .find(|b| &b.slug == slug)
                .is_some_and(|b| b.author != self.form.author);
            if author_changed {
                self.notices
                    .error("The author cannot be changed after a post is created");
                return Navigation::Stay;
            }
        }

        let result = match &self.editing {
            Some(slug) => self
                .client
                .update_blog(slug, &self.form.to_update())
                .await
                .map(|_| "Blog updated successfully"),
            None => self
                .client
                .create_blog(&self.form.to_create())
                .await
                .map(|_| "Blog created successfully"),
        };

        match result {
            Ok(message) => {
                self.notices.success(message);
                self.dialog_open = false;
                self.refresh().await
            }
            Err(e) => handle_failure(&self.client, &mut self.notices, e, "Failed to save blog"),
        }
    }

    pub async fn delete(&mut self, slug: &str) -> Navigation {
        match self.client.delete_blog(slug).await {
            Ok(_) => {
                self.notices.success("Blog deleted successfully");
                self.refresh().await
            }
            Err(e) => handle_failure(&self.client, &mut self.notices, e, "Failed to delete blog"),
        }
    }
}
