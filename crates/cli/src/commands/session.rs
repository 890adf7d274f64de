use anyhow::{Context, Result};
use madeen_core::{Locale, Section, SiteConfig, Theme};
use madeen_stores::{DirFetcher, Fetcher, Host, HttpFetcher, MemoryHost, Site};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use super::load_site;

pub struct SessionOptions {
    pub path: PathBuf,
    pub url: Option<String>,
    pub stored_locale: Option<String>,
    pub stored_theme: Option<String>,
    pub locale: Option<Locale>,
    pub theme: Option<Theme>,
    pub toggle_locale: bool,
    pub toggle_theme: bool,
    pub offline: bool,
}

/// Start the site's stores against an in-memory browser and report where
/// they settle.
///
/// Stored values are written verbatim, so unrecognized values exercise
/// the same fallbacks a real visitor's stale storage would.
pub async fn run(options: SessionOptions) -> Result<()> {
    let config = load_site(&options.path)?;

    let start_url = match &options.url {
        Some(raw) => Url::parse(raw).with_context(|| format!("Invalid URL: {}", raw))?,
        None => config.page_url("/")?,
    };

    let mut host = MemoryHost::new(start_url.clone());
    if let Some(locale) = &options.stored_locale {
        host = host.with_storage(&config.storage.locale, locale);
    }
    if let Some(theme) = &options.stored_theme {
        host = host.with_storage(&config.storage.theme, theme);
    }
    let host = Arc::new(host);

    let fetcher = build_fetcher(&options, &config)?;

    println!("🌐 Starting session at: {}", start_url);

    let dyn_host: Arc<dyn Host> = host.clone();
    let site = Site::interactive(config, dyn_host, fetcher);
    let (locale, theme) = site.start();
    println!("   ✓ Locale: {} ({})", locale, locale.direction().as_str());
    println!("   ✓ Theme: {}", theme);

    if let Some(locale) = options.locale {
        site.locale().set(locale);
        println!("   → Locale set to: {}", locale);
    }
    if let Some(theme) = options.theme {
        site.theme().set(theme);
        println!("   → Theme set to: {}", theme);
    }
    if options.toggle_locale {
        let locale = site.locale().toggle();
        println!("   ↻ Locale toggled to: {}", locale);
    }
    if options.toggle_theme {
        let theme = site.theme().toggle();
        println!("   ↻ Theme toggled to: {}", theme);
    }

    site.data().settle().await;

    println!();
    print_summary(&site, &host);
    Ok(())
}

fn build_fetcher(options: &SessionOptions, config: &SiteConfig) -> Result<Arc<dyn Fetcher>> {
    if options.offline {
        let dir = options.path.join(&config.content_dir);
        if !dir.is_dir() {
            anyhow::bail!("Content directory not found: {}", dir.display());
        }
        Ok(Arc::new(DirFetcher::new(dir)))
    } else {
        let fetcher = HttpFetcher::new(config.clone()).context("Failed to create HTTP client")?;
        Ok(Arc::new(fetcher))
    }
}

fn print_summary(site: &Site, host: &MemoryHost) {
    let locale: Locale = site.locale().get();
    let theme: Theme = site.theme().get();

    println!("📋 Session state");
    println!("   Locale:    {}", locale);
    println!("   RTL:       {}", site.rtl().get());
    println!("   Theme:     {}", theme);
    println!("   URL:       {}", host.url());
    println!(
        "   Document:  lang={} dir={} data-theme={} class={}",
        host.attribute("lang").unwrap_or_default(),
        host.attribute("dir").unwrap_or_default(),
        host.attribute("data-theme").unwrap_or_default(),
        host.class_name()
    );

    let storage = &site.config().storage;
    println!(
        "   Storage:   {}={} {}={}",
        storage.locale,
        host.stored(&storage.locale).unwrap_or_default(),
        storage.theme,
        host.stored(&storage.theme).unwrap_or_default()
    );

    println!();
    println!("📄 Sections");
    let snapshot = site.data().snapshot();
    for section in Section::ALL {
        match snapshot.get(section) {
            Some(_) => println!("   ✓ {}", section),
            None => println!("   ✗ {} (not loaded)", section),
        }
    }
}
