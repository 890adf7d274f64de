use crate::error::{Error, Result};
use crate::types::Section;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use url::Url;

pub const DEFAULT_BASE: &str = "/maaden-constructions";
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_LOCALE_KEY: &str = "madeen-language";
pub const DEFAULT_THEME_KEY: &str = "madeen-theme";
pub const DEFAULT_CONTENT_DIR: &str = "static/data";

/// Raw TOML configuration structure
/// Every table and field is optional; gaps are filled from the defaults above
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    site: RawSite,
    #[serde(default)]
    storage: RawStorage,
    #[serde(default)]
    content: RawContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    base: Option<String>,
    origin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStorage {
    locale_key: Option<String>,
    theme_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContent {
    dir: Option<String>,
}

/// Local storage keys the stores persist under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub locale: String,
    pub theme: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE_KEY.to_string(),
            theme: DEFAULT_THEME_KEY.to_string(),
        }
    }
}

/// Site configuration (madeen.toml)
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Path prefix the site is mounted under, empty or `/segment[/segment]`
    pub base: String,
    /// Scheme and authority content is fetched from
    pub origin: Url,
    pub storage: StorageKeys,
    /// Content directory, relative to the site root
    pub content_dir: PathBuf,
}

impl SiteConfig {
    /// URL a section's content document is served from: `<origin><base>/data/<section>.json`
    pub fn section_url(&self, section: Section) -> Result<Url> {
        let path = format!("{}/data/{}", self.base, section.file_name());
        self.origin
            .join(&path)
            .map_err(|e| Error::InvalidData(format!("Invalid section URL '{}': {}", path, e)))
    }

    /// Absolute URL of a page path under the site base, e.g. `/contact`
    pub fn page_url(&self, page: &str) -> Result<Url> {
        let page = page.trim_start_matches('/');
        let path = format!("{}/{}", self.base, page);
        self.origin
            .join(&path)
            .map_err(|e| Error::InvalidData(format!("Invalid page URL '{}': {}", path, e)))
    }
}

/// Load madeen.toml from a file path. A missing file yields the defaults.
pub fn load_site_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return parse_site_config_str("");
    }
    let content = fs::read_to_string(path)?;
    parse_site_config_str(&content)
}

/// Parse madeen.toml from a string (useful for testing)
pub fn parse_site_config_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let base = validate_base(raw.site.base.as_deref().unwrap_or(DEFAULT_BASE))?;

    let origin_str = raw.site.origin.as_deref().unwrap_or(DEFAULT_ORIGIN);
    let origin = Url::parse(origin_str)
        .map_err(|e| Error::ConfigParse(format!("Invalid site.origin '{}': {}", origin_str, e)))?;
    if !matches!(origin.scheme(), "http" | "https") {
        return Err(Error::ConfigParse(format!(
            "site.origin must use http or https: '{}'",
            origin_str
        )));
    }

    let storage = StorageKeys {
        locale: validate_key(raw.storage.locale_key, DEFAULT_LOCALE_KEY, "storage.locale_key")?,
        theme: validate_key(raw.storage.theme_key, DEFAULT_THEME_KEY, "storage.theme_key")?,
    };
    if storage.locale == storage.theme {
        return Err(Error::ConfigParse(format!(
            "storage.locale_key and storage.theme_key must differ (both '{}')",
            storage.locale
        )));
    }

    let content_dir = validate_path(
        raw.content.dir.as_deref().unwrap_or(DEFAULT_CONTENT_DIR),
        "content.dir",
    )?;

    Ok(SiteConfig {
        base,
        origin,
        storage,
        content_dir,
    })
}

fn validate_base(base: &str) -> Result<String> {
    if base.is_empty() {
        return Ok(String::new());
    }
    if !base.starts_with('/') || base.ends_with('/') {
        return Err(Error::ConfigParse(format!(
            "site.base must start with '/' and must not end with '/': '{}'",
            base
        )));
    }
    if base.contains(['?', '#', ' ']) {
        return Err(Error::ConfigParse(format!(
            "site.base must be a plain path: '{}'",
            base
        )));
    }
    Ok(base.to_string())
}

fn validate_key(key: Option<String>, default: &str, field_name: &str) -> Result<String> {
    let key = key.unwrap_or_else(|| default.to_string());
    if key.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty storage key in '{}' field",
            field_name
        )));
    }
    Ok(key)
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so the
/// content directory always stays inside the site root.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, path_str
        )));
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_site_config_str("").unwrap();
        assert_eq!(config.base, "/maaden-constructions");
        assert_eq!(config.origin.as_str(), "http://localhost:8080/");
        assert_eq!(config.storage.locale, "madeen-language");
        assert_eq!(config.storage.theme, "madeen-theme");
        assert_eq!(config.content_dir, PathBuf::from("static/data"));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
base = "/site"
origin = "https://example.com"

[storage]
locale_key = "lang"
theme_key = "theme"

[content]
dir = "public/content"
        "#;

        let config = parse_site_config_str(toml).unwrap();
        assert_eq!(config.base, "/site");
        assert_eq!(config.origin.host_str(), Some("example.com"));
        assert_eq!(config.storage.locale, "lang");
        assert_eq!(config.content_dir, PathBuf::from("public/content"));
    }

    #[test]
    fn test_section_url() {
        let config = parse_site_config_str("").unwrap();
        assert_eq!(
            config.section_url(Section::Hero).unwrap().as_str(),
            "http://localhost:8080/maaden-constructions/data/hero.json"
        );

        let config = parse_site_config_str("[site]\nbase = \"\"").unwrap();
        assert_eq!(
            config.section_url(Section::Footer).unwrap().as_str(),
            "http://localhost:8080/data/footer.json"
        );
    }

    #[test]
    fn test_page_url() {
        let config = parse_site_config_str("").unwrap();
        assert_eq!(
            config.page_url("/contact").unwrap().as_str(),
            "http://localhost:8080/maaden-constructions/contact"
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        for base in ["site", "/site/", "/si te"] {
            let toml = format!("[site]\nbase = \"{}\"", base);
            let result = parse_site_config_str(&toml);
            assert!(result.is_err(), "accepted base {:?}", base);
            assert!(result.unwrap_err().to_string().contains("site.base"));
        }
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let result = parse_site_config_str("[site]\norigin = \"ftp://example.com\"");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("http or https"));

        assert!(parse_site_config_str("[site]\norigin = \"not a url\"").is_err());
    }

    #[test]
    fn test_rejects_empty_or_shared_storage_keys() {
        let result = parse_site_config_str("[storage]\nlocale_key = \"  \"");
        assert!(result.unwrap_err().to_string().contains("storage.locale_key"));

        let result = parse_site_config_str("[storage]\nlocale_key = \"k\"\ntheme_key = \"k\"");
        assert!(result.unwrap_err().to_string().contains("must differ"));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(parse_site_config_str("[site]\nbsae = \"/x\"").is_err());
    }

    #[test]
    fn test_validate_path_rejects_traversal_and_absolute() {
        let result = validate_path("../outside", "content.dir");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Parent directory references")
        );

        let result = validate_path("/etc", "content.dir");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Absolute paths not allowed")
        );

        let result = validate_path("   ", "content.dir");
        assert!(result.unwrap_err().to_string().contains("Empty path"));
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_site_config(dir.path().join("madeen.toml")).unwrap();
        assert_eq!(config.base, DEFAULT_BASE);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("madeen.toml");
        fs::write(&path, "[site]\nbase = \"/preview\"\n").unwrap();
        let config = load_site_config(&path).unwrap();
        assert_eq!(config.base, "/preview");
    }
}
