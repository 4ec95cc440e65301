use super::{handle_failure, parse_optional_int, FormError, Navigation, Notices};
use crate::{
    client::ApiClient,
    models::{CreateKeywordDto, Difficulty, Keyword, SitePage},
};

/// The "add keyword" dialog. Numeric fields hold raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordForm {
    pub keyword: String,
    pub page: Option<SitePage>,
    pub ranking: String,
    pub search_volume: String,
    pub difficulty: Option<Difficulty>,
}

impl KeywordForm {
    pub fn to_dto(&self) -> Result<CreateKeywordDto, FormError> {
        let keyword = self.keyword.trim();
        let page = match self.page {
            Some(page) if !keyword.is_empty() => page,
            _ => return Err(FormError::MissingFields("Please fill in keyword and page")),
        };

        Ok(CreateKeywordDto {
            keyword: keyword.to_string(),
            page,
            ranking: parse_optional_int("Ranking", &self.ranking)?,
            search_volume: parse_optional_int("Search volume", &self.search_volume)?,
            difficulty: self.difficulty,
        })
    }
}

pub struct KeywordTracker {
    client: ApiClient,
    pub keywords: Vec<Keyword>,
    pub form: KeywordForm,
    pub dialog_open: bool,
    pub loading: bool,
    pub notices: Notices,
}

impl KeywordTracker {
    pub fn new(client: ApiClient) -> Self {
        KeywordTracker {
            client,
            keywords: Vec::new(),
            form: KeywordForm::default(),
            dialog_open: false,
            loading: true,
            notices: Notices::default(),
        }
    }

    pub async fn mount(&mut self) -> Navigation {
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Navigation {
        let result = self.client.list_keywords().await;
        self.loading = false;
        match result {
            Ok(keywords) => {
                self.keywords = keywords;
                Navigation::Stay
            }
            Err(e) => handle_failure(&self.client, &mut self.notices, e, "Failed to load keywords"),
        }
    }

    pub fn open_dialog(&mut self) {
        self.dialog_open = true;
    }

    /// Track the keyword in the form. The form is reset only on success.
    pub async fn add(&mut self) -> Result<Navigation, FormError> {
        let dto = match self.form.to_dto() {
            Ok(dto) => dto,
            Err(e) => {
                self.notices.error(e.to_string());
                return Err(e);
            }
        };

        match self.client.create_keyword(&dto).await {
            Ok(_) => {
                self.notices.success("Keyword added successfully");
                self.dialog_open = false;
                self.form = KeywordForm::default();
                Ok(self.refresh().await)
            }
            Err(e) => Ok(handle_failure(
                &self.client,
                &mut self.notices,
                e,
                "Failed to add keyword",
            )),
        }
    }

    pub async fn delete(&mut self, keyword_id: &str) -> Navigation {
        match self.client.delete_keyword(keyword_id).await {
            Ok(_) => {
                self.notices.success("Keyword deleted successfully");
                self.refresh().await
            }
            Err(e) => handle_failure(&self.client, &mut self.notices, e, "Failed to delete keyword"),
        }
    }
}
