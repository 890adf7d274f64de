//! Content bundled into the binary for route-level loaders.

use serde::{Deserialize, Serialize};

pub const CONTACT_SOURCE: &str = include_str!("../content/contact.json");
pub const SERVICES_SOURCE: &str = include_str!("../content/services.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactContent {
    pub title: String,
    pub subtitle: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
    pub form: ContactFormLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactFormLabels {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub submit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesContent {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Stable across locales; used as the anchor and modal key
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub details: Vec<String>,
}
