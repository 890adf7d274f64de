use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language of the site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ar];

    /// Language tag as written to storage, the URL and the `lang` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    /// Recognize an exact language tag. Anything else is `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "en" => Some(Locale::En),
            "ar" => Some(Locale::Ar),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Locale::Ar => Direction::Rtl,
            Locale::En => Direction::Ltr,
        }
    }

    pub fn is_rtl(self) -> bool {
        self.direction() == Direction::Rtl
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Locale::from_tag(s)
            .ok_or_else(|| Error::InvalidData(format!("Unrecognized locale '{}'", s)))
    }
}

/// Text direction, written to the root `dir` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Visual color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "madeen-light")]
    Light,
    #[serde(rename = "madeen-dark")]
    Dark,
}

impl Theme {
    /// Token persisted in storage and written to `data-theme`
    pub fn token(self) -> &'static str {
        match self {
            Theme::Light => "madeen-light",
            Theme::Dark => "madeen-dark",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "madeen-light" => Some(Theme::Light),
            "madeen-dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Class name set on the root element, e.g. `theme-madeen-dark`
    pub fn class_name(self) -> String {
        format!("theme-{}", self.token())
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Theme {
    type Err = Error;

    /// Accepts both the storage token and the short names `light`/`dark`
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Theme::from_token(other)
                .ok_or_else(|| Error::InvalidData(format!("Unrecognized theme '{}'", other))),
        }
    }
}

/// Independently fetched content area of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Home,
    Navigation,
    Services,
    About,
    Contact,
    Footer,
    Hero,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Home,
        Section::Navigation,
        Section::Services,
        Section::About,
        Section::Contact,
        Section::Footer,
        Section::Hero,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Navigation => "navigation",
            Section::Services => "services",
            Section::About => "about",
            Section::Contact => "contact",
            Section::Footer => "footer",
            Section::Hero => "hero",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Name of the JSON document holding this section's content
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document carrying the same content in both locales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bilingual<T> {
    pub en: T,
    pub ar: T,
}

impl<T> Bilingual<T> {
    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
        }
    }

    pub fn select(self, locale: Locale) -> T {
        match locale {
            Locale::En => self.en,
            Locale::Ar => self.ar,
        }
    }
}

impl<T: DeserializeOwned> Bilingual<T> {
    /// Parse a bilingual JSON document, rejecting it if either locale is missing
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Section content whose per-locale shape is left to the page that renders it
pub type ContentDocument = Bilingual<serde_json::Value>;

/// Parse a section document, additionally rejecting `null` slices
pub fn parse_content_document(content: &str) -> Result<ContentDocument> {
    let doc = ContentDocument::from_json_str(content)?;
    for locale in Locale::ALL {
        if doc.get(locale).is_null() {
            return Err(Error::InvalidData(format!(
                "Locale '{}' has no content",
                locale
            )));
        }
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_toggle_is_involution() {
        for locale in Locale::ALL {
            assert_eq!(locale.toggled().toggled(), locale);
            assert_ne!(locale.toggled(), locale);
        }
    }

    #[test]
    fn test_locale_direction() {
        assert_eq!(Locale::Ar.direction().as_str(), "rtl");
        assert_eq!(Locale::En.direction().as_str(), "ltr");
        assert!(Locale::Ar.is_rtl());
        assert!(!Locale::En.is_rtl());
    }

    #[test]
    fn test_locale_from_tag_is_exact() {
        assert_eq!(Locale::from_tag("ar"), Some(Locale::Ar));
        assert_eq!(Locale::from_tag("en"), Some(Locale::En));
        assert_eq!(Locale::from_tag("AR"), None);
        assert_eq!(Locale::from_tag("en-US"), None);
        assert_eq!(Locale::from_tag(""), None);
        assert!("xx".parse::<Locale>().is_err());
    }

    #[test]
    fn test_theme_tokens_and_class() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Dark.token(), "madeen-dark");
        assert_eq!(Theme::Light.class_name(), "theme-madeen-light");
        assert_eq!(Theme::from_token("madeen-dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_token("dark"), None);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("madeen-light".parse::<Theme>().unwrap(), Theme::Light);
    }

    #[test]
    fn test_section_names() {
        assert_eq!(Section::ALL.len(), 7);
        for section in Section::ALL {
            assert_eq!(Section::from_name(section.as_str()), Some(section));
        }
        assert_eq!(Section::Contact.file_name(), "contact.json");
        assert_eq!(Section::from_name("blog"), None);
    }

    #[test]
    fn test_parse_content_document_selects_locale() {
        let doc = parse_content_document(r#"{"en": {"title": "Home"}, "ar": {"title": "الرئيسية"}}"#)
            .unwrap();
        assert_eq!(doc.get(Locale::En)["title"], "Home");
        assert_eq!(doc.select(Locale::Ar)["title"], "الرئيسية");
    }

    #[test]
    fn test_parse_content_document_rejects_missing_locale() {
        let result = parse_content_document(r#"{"en": {"title": "Home"}}"#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ar"));
    }

    #[test]
    fn test_parse_content_document_rejects_null_locale() {
        let result = parse_content_document(r#"{"en": {"title": "Home"}, "ar": null}"#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no content"));
    }

    #[test]
    fn test_parse_content_document_rejects_garbage() {
        assert!(parse_content_document("<html>not json</html>").is_err());
        assert!(parse_content_document("[]").is_err());
    }
}
