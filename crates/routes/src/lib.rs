//! Route-level loaders for pages that render from bundled content.
//!
//! Loaders take the page URL's `lang` parameter at face value. They do not
//! consult the shared locale store, so a page can render in a different
//! language than the one last toggled until the page reconciles the two.

pub mod contact;
pub mod content;
pub mod services;

use madeen_core::{Bilingual, Locale};
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error};
use url::Url;

/// Pages with a route-level loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Contact,
    Services,
}

impl Route {
    pub fn as_str(self) -> &'static str {
        match self {
            Route::Contact => "contact",
            Route::Services => "services",
        }
    }

    /// Run the route's loader and return its page data as JSON
    pub fn load(self, url: &Url) -> serde_json::Value {
        let result = match self {
            Route::Contact => serde_json::to_value(contact::load(url)),
            Route::Services => serde_json::to_value(services::load(url)),
        };
        result.unwrap_or_else(|e| {
            error!(route = self.as_str(), error = %e, "Error serializing page data");
            serde_json::Value::Null
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = madeen_core::Error;

    fn from_str(s: &str) -> madeen_core::Result<Self> {
        match s {
            "contact" => Ok(Route::Contact),
            "services" => Ok(Route::Services),
            other => Err(madeen_core::Error::InvalidData(format!(
                "No loader for route '{}'",
                other
            ))),
        }
    }
}

/// Locale requested by the page URL. Missing, empty and unrecognized
/// values all mean English.
pub fn requested_locale(url: &Url) -> Locale {
    url.query_pairs()
        .find(|(k, _)| k == "lang")
        .and_then(|(_, v)| Locale::from_tag(&v))
        .unwrap_or_default()
}

/// Parse a bundled bilingual document and pick the slice the URL asks for
fn load_slice<T: DeserializeOwned>(route: Route, source: &str, url: &Url) -> Option<T> {
    let locale = requested_locale(url);
    match Bilingual::<T>::from_json_str(source) {
        Ok(document) => {
            debug!(route = route.as_str(), %locale, "Page data loaded");
            Some(document.select(locale))
        }
        Err(e) => {
            error!(route = route.as_str(), %locale, error = %e, "Error loading page data");
            None
        }
    }
}
