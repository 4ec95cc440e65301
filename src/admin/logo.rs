use super::{handle_failure, FormError, Navigation, Notices};
use crate::{
    client::ApiClient,
    handlers::logo::MAX_LOGO_SIZE,
    models::{CurrentLogo, Logo},
};

/// A file picked for upload but not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub struct LogoManager {
    client: ApiClient,
    pub current: Option<CurrentLogo>,
    pub history: Vec<Logo>,
    pub selected: Option<SelectedFile>,
    pub loading: bool,
    pub notices: Notices,
}

impl LogoManager {
    pub fn new(client: ApiClient) -> Self {
        LogoManager {
            client,
            current: None,
            history: Vec::new(),
            selected: None,
            loading: true,
            notices: Notices::default(),
        }
    }

    /// Without a stored token the screen goes straight to login.
    pub async fn mount(&mut self) -> Navigation {
        if !self.client.is_logged_in() {
            return Navigation::Login;
        }
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Navigation {
        let current = self.client.current_logo().await;
        self.loading = false;
        match current {
            Ok(logo) => self.current = Some(logo),
            Err(e) => {
                let nav = handle_failure(&self.client, &mut self.notices, e, "Failed to load logo");
                if nav == Navigation::Login {
                    return nav;
                }
            }
        }

        match self.client.logo_history().await {
            Ok(history) => {
                self.history = history;
                Navigation::Stay
            }
            Err(e) => handle_failure(
                &self.client,
                &mut self.notices,
                e,
                "Failed to load logo history",
            ),
        }
    }

    /// Stage a file for upload after checking its type and size.
    pub fn select_file(
        &mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<(), FormError> {
        let content_type = content_type.into();
        let err = if !content_type.starts_with("image/") {
            Some(FormError::NotAnImage)
        } else if data.len() > MAX_LOGO_SIZE {
            Some(FormError::FileTooLarge)
        } else {
            None
        };

        if let Some(e) = err {
            self.notices.error(e.to_string());
            return Err(e);
        }

        self.selected = Some(SelectedFile {
            filename: filename.into(),
            content_type,
            data,
        });
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.selected = None;
    }

    pub async fn upload(&mut self) -> Result<Navigation, FormError> {
        let Some(file) = self.selected.clone() else {
            let e = FormError::MissingFields("Please select a file first");
            self.notices.error(e.to_string());
            return Err(e);
        };

        match self
            .client
            .upload_logo(&file.filename, &file.content_type, file.data)
            .await
        {
            Ok(_) => {
                self.notices.success("Logo uploaded successfully");
                self.selected = None;
                Ok(self.refresh().await)
            }
            Err(e) => Ok(handle_failure(
                &self.client,
                &mut self.notices,
                e,
                "Failed to upload logo",
            )),
        }
    }
}
