pub mod config;
pub mod error;
pub mod types;

pub use config::{SiteConfig, StorageKeys, load_site_config, parse_site_config_str};
pub use error::{Error, Result};
pub use types::*;
