//! Retrieval of raw section documents.

use async_trait::async_trait;
use madeen_core::{Error, Result, Section, SiteConfig};
use std::path::PathBuf;
use tracing::debug;

/// Source of section documents. Implementations return the raw JSON text;
/// parsing and locale selection happen in the data store.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, section: Section) -> Result<String>;
}

/// Fetches `<origin><base>/data/<section>.json` over HTTP
pub struct HttpFetcher {
    client: reqwest::Client,
    config: SiteConfig,
}

impl HttpFetcher {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, section: Section) -> Result<String> {
        let url = self.config.section_url(section)?;
        debug!(%section, %url, "Fetching section");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to load {} data: {}", section, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "Failed to load {} data: {}",
                section,
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read {} data: {}", section, e)))
    }
}

/// Reads `<dir>/<section>.json` from disk
pub struct DirFetcher {
    dir: PathBuf,
}

impl DirFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Fetcher for DirFetcher {
    async fn fetch(&self, section: Section) -> Result<String> {
        let path = self.dir.join(section.file_name());
        debug!(%section, path = %path.display(), "Reading section");
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use madeen_core::parse_site_config_str;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> SiteConfig {
        parse_site_config_str(&format!("[site]\norigin = \"{}\"\nbase = \"/site\"", server.uri()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_http_fetcher_reads_section_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/site/data/hero.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"en": {}, "ar": {}}"#))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(config_for(&server)).unwrap();
        let body = fetcher.fetch(Section::Hero).await.unwrap();
        assert_eq!(body, r#"{"en": {}, "ar": {}}"#);
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/site/data/about.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(config_for(&server)).unwrap();
        let err = fetcher.fetch(Section::About).await.unwrap_err();
        assert!(err.to_string().contains("Failed to load about data: 404"));
    }

    #[tokio::test]
    async fn test_dir_fetcher_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("footer.json"), r#"{"en": 1, "ar": 2}"#).unwrap();

        let fetcher = DirFetcher::new(dir.path());
        assert_eq!(fetcher.fetch(Section::Footer).await.unwrap(), r#"{"en": 1, "ar": 2}"#);
        assert!(fetcher.fetch(Section::Home).await.is_err());
    }
}
