pub mod check;
pub mod page;
pub mod serve;
pub mod session;

use anyhow::{Context, Result};
use madeen_core::{SiteConfig, load_site_config};
use std::path::Path;

/// Configuration file expected at the root of a site directory
pub const CONFIG_FILE: &str = "madeen.toml";

/// Load `<site>/madeen.toml`, falling back to defaults when it is absent
pub fn load_site(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }
    let config_path = path.join(CONFIG_FILE);
    load_site_config(&config_path)
        .with_context(|| format!("Failed to parse {}", config_path.display()))
}
