use serde_json::Value;

use super::{handle_failure, FormError, Navigation, Notices};
use crate::{
    client::{ApiClient, ClientError},
    models::{SeoSettings, SeoSettingsDto, SitePage},
};

/// Text fields as typed by the user. `json_ld` holds raw JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoForm {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub og_image: String,
    pub json_ld: String,
}

impl From<&SeoSettings> for SeoForm {
    fn from(seo: &SeoSettings) -> Self {
        SeoForm {
            title: seo.title.clone().unwrap_or_default(),
            description: seo.description.clone().unwrap_or_default(),
            keywords: seo.keywords.clone().unwrap_or_default(),
            og_image: seo.og_image.clone().unwrap_or_default(),
            json_ld: seo
                .json_ld
                .as_ref()
                .and_then(|v| serde_json::to_string_pretty(&v.0).ok())
                .unwrap_or_default(),
        }
    }
}

impl SeoForm {
    /// Parse the JSON-LD text. Blank text clears the field.
    pub fn parse_json_ld(&self) -> Result<Option<Value>, FormError> {
        let raw = self.json_ld.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(v @ Value::Object(_)) => Ok(Some(v)),
            Ok(_) => Err(FormError::InvalidJsonLd("expected a JSON object".into())),
            Err(e) => Err(FormError::InvalidJsonLd(e.to_string())),
        }
    }

    pub fn to_dto(&self, page: SitePage) -> Result<SeoSettingsDto, FormError> {
        Ok(SeoSettingsDto {
            page: Some(page),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            keywords: Some(self.keywords.clone()),
            og_image: Some(self.og_image.clone()),
            json_ld: self.parse_json_ld()?,
        })
    }
}

pub struct SeoManager {
    client: ApiClient,
    pub settings: Vec<SeoSettings>,
    pub robots_txt: String,
    pub selected: Option<SitePage>,
    pub form: SeoForm,
    /// Last sitemap fetched through [`SeoManager::generate_sitemap`].
    pub sitemap: Option<String>,
    pub loading: bool,
    pub notices: Notices,
}

impl SeoManager {
    pub fn new(client: ApiClient) -> Self {
        SeoManager {
            client,
            settings: Vec::new(),
            robots_txt: String::new(),
            selected: None,
            form: SeoForm::default(),
            sitemap: None,
            loading: true,
            notices: Notices::default(),
        }
    }

    /// Load all SEO entries and the current robots.txt.
    pub async fn mount(&mut self) -> Navigation {
        let result = async {
            let settings = self.client.list_seo().await?;
            let robots = self.client.get_robots_txt().await?;
            Ok::<_, ClientError>((settings, robots))
        }
        .await;
        self.loading = false;

        match result {
            Ok((settings, robots)) => {
                self.settings = settings;
                self.robots_txt = robots;
                self.reload_form();
                Navigation::Stay
            }
            Err(e) => handle_failure(&self.client, &mut self.notices, e, "Failed to load SEO data"),
        }
    }

    /// Switch the form to `page`, pre-filled from its saved entry if any.
    pub fn select_page(&mut self, page: SitePage) {
        self.selected = Some(page);
        self.reload_form();
    }

    fn reload_form(&mut self) {
        let Some(page) = self.selected else {
            return;
        };
        self.form = self
            .settings
            .iter()
            .find(|s| s.page == page)
            .map(SeoForm::from)
            .unwrap_or_default();
    }

    /// Save the form for the selected page.
    ///
    /// Form problems are returned as `Err` and reported as an error notice.
    /// The form keeps its contents and no request is sent.
    pub async fn save(&mut self) -> Result<Navigation, FormError> {
        let Some(page) = self.selected else {
            self.notices.error("Please select a page");
            return Err(FormError::MissingFields("Please select a page"));
        };

        let dto = match self.form.to_dto(page) {
            Ok(dto) => dto,
            Err(e) => {
                self.notices.error(e.to_string());
                return Err(e);
            }
        };

        match self.client.save_seo(page, &dto).await {
            Ok(_) => {
                self.notices.success("SEO settings saved successfully");
                Ok(self.mount().await)
            }
            Err(e) => Ok(handle_failure(
                &self.client,
                &mut self.notices,
                e,
                "Failed to save SEO settings",
            )),
        }
    }

    pub async fn save_robots(&mut self) -> Navigation {
        match self.client.save_robots_txt(&self.robots_txt).await {
            Ok(_) => {
                self.notices.success("robots.txt updated successfully");
                Navigation::Stay
            }
            Err(e) => handle_failure(
                &self.client,
                &mut self.notices,
                e,
                "Failed to update robots.txt",
            ),
        }
    }

    pub async fn generate_sitemap(&mut self) -> Navigation {
        match self.client.generate_sitemap().await {
            Ok(xml) => {
                self.sitemap = Some(xml);
                self.notices.success("Sitemap generated successfully");
                Navigation::Stay
            }
            Err(e) => handle_failure(
                &self.client,
                &mut self.notices,
                e,
                "Failed to generate sitemap",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_json_ld_is_none() {
        let form = SeoForm::default();
        assert_eq!(form.parse_json_ld(), Ok(None));
    }

    #[test]
    fn object_json_ld_is_parsed() {
        let form = SeoForm {
            json_ld: r#"{ "@context": "https://schema.org", "@type": "Organization" }"#.into(),
            ..Default::default()
        };
        let value = form.parse_json_ld().unwrap().unwrap();
        assert_eq!(value["@type"], "Organization");
    }

    #[test]
    fn malformed_json_ld_is_a_form_error() {
        let form = SeoForm {
            json_ld: r#"{ "@type": "Organization", }"#.into(),
            ..Default::default()
        };
        assert!(matches!(
            form.to_dto(SitePage::Home),
            Err(FormError::InvalidJsonLd(_))
        ));
    }

    #[test]
    fn non_object_json_ld_is_rejected() {
        let form = SeoForm {
            json_ld: "[1, 2, 3]".into(),
            ..Default::default()
        };
        assert!(form.parse_json_ld().is_err());
    }
}
