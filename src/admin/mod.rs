//! Admin CRUD managers.
//!
//! Each manager owns a list of entities, one form, and a queue of
//! [`Notice`]s. Operations talk to the API through [`ApiClient`], refresh the
//! list after every successful mutation, and report a 401 as
//! [`Navigation::Login`] after clearing the stored token.

mod blog;
mod keyword;
mod logo;
mod seo;

pub use blog::{BlogForm, BlogManager};
pub use keyword::{KeywordForm, KeywordTracker};
pub use logo::{LogoManager, SelectedFile};
pub use seo::{SeoForm, SeoManager};

use thiserror::Error;

use crate::client::{ApiClient, ClientError};

/// Where the login screen lives.
pub const LOGIN_ROUTE: &str = "/admin/login";

/// Toast-style feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// What the surrounding UI should do after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Login,
}

/// Form problems caught before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0}")]
    MissingFields(&'static str),

    #[error("Invalid JSON-LD: {0}")]
    InvalidJsonLd(String),

    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Please select an image file")]
    NotAnImage,

    #[error("File size must be less than 5MB")]
    FileTooLarge,
}

#[derive(Debug, Default)]
pub struct Notices {
    queue: Vec<Notice>,
}

impl Notices {
    pub fn success(&mut self, message: impl Into<String>) {
        self.queue.push(Notice::Success(message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.queue.push(Notice::Error(message.into()));
    }

    pub fn last(&self) -> Option<&Notice> {
        self.queue.last()
    }

    /// Hand queued notices to the UI and forget them.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.queue)
    }
}

/// Shared failure path for every manager operation.
///
/// A 401 clears the token and asks for the login screen without a toast.
/// Any other failure becomes an error notice, using the server's message
/// when there is one and `fallback` otherwise.
pub(crate) fn handle_failure(
    client: &ApiClient,
    notices: &mut Notices,
    err: ClientError,
    fallback: &str,
) -> Navigation {
    match err {
        ClientError::Unauthorized => {
            if let Err(e) = client.logout() {
                tracing::warn!(error = %e, "Failed to clear stale admin token");
            }
            Navigation::Login
        }
        other => {
            tracing::warn!(error = %other, "{fallback}");
            notices.error(other.user_message().unwrap_or(fallback).to_string());
            Navigation::Stay
        }
    }
}

/// Parse an optional integer form field: blank means `None`.
pub(crate) fn parse_optional_int(
    field: &'static str,
    raw: &str,
) -> Result<Option<i64>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| FormError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}
