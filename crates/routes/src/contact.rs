use crate::content::{CONTACT_SOURCE, ContactContent};
use crate::{Route, load_slice};
use serde::Serialize;
use url::Url;

/// Page data for `/contact`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPageData {
    pub contact_data: Option<ContactContent>,
}

/// Select the contact content for the URL's `lang` parameter
pub fn load(url: &Url) -> ContactPageData {
    ContactPageData {
        contact_data: load_slice(Route::Contact, CONTACT_SOURCE, url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(url: &str) -> ContactPageData {
        load(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_load_arabic() {
        let page = load_str("http://localhost/maaden-constructions/contact?lang=ar");
        assert_eq!(page.contact_data.unwrap().title, "تواصل معنا");
    }

    #[test]
    fn test_load_defaults_to_english() {
        let page = load_str("http://localhost/maaden-constructions/contact");
        assert_eq!(page.contact_data.unwrap().title, "Contact Us");
    }

    #[test]
    fn test_unrecognized_lang_resolves_to_english() {
        let english = load_str("http://localhost/contact?lang=en");
        let unknown = load_str("http://localhost/contact?lang=xx");
        assert!(unknown.contact_data.is_some());
        assert_eq!(unknown, english);
    }

    #[test]
    fn test_serializes_named_field() {
        let page = load_str("http://localhost/contact");
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["contactData"]["form"]["submit"], "Send message");
    }
}
