use anyhow::{Context, Result};
use madeen_routes::Route;
use std::path::PathBuf;
use url::Url;

use super::load_site;

/// Run a route loader for a URL and print the page data as JSON
pub async fn run(route: String, path: PathBuf, url: Option<String>) -> Result<()> {
    let route: Route = route.parse()?;
    let config = load_site(&path)?;

    let url = match url {
        Some(raw) => Url::parse(&raw).with_context(|| format!("Invalid URL: {}", raw))?,
        None => config.page_url(route.as_str())?,
    };

    let data = route.load(&url);
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
