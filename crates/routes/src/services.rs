use crate::content::{SERVICES_SOURCE, ServicesContent};
use crate::{Route, load_slice};
use serde::Serialize;
use url::Url;

/// Page data for `/services`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesPageData {
    pub services_data: Option<ServicesContent>,
}

/// Select the services content for the URL's `lang` parameter
pub fn load(url: &Url) -> ServicesPageData {
    ServicesPageData {
        services_data: load_slice(Route::Services, SERVICES_SOURCE, url),
    }
}
