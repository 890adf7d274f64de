use crate::data::DataStore;
use crate::fetch::Fetcher;
use crate::host::Host;
use crate::locale::LocaleStore;
use crate::observable::Subscription;
use crate::rtl::RtlFlag;
use crate::theme::ThemeStore;
use madeen_core::{Locale, SiteConfig, Theme};
use std::sync::Arc;
use tracing::info;

/// Composition root owning every store and the bindings between them.
///
/// In an interactive session the data store follows the locale store from
/// construction onward, so the first reload for the default locale starts
/// before [`Site::start`] resolves the persisted one.
pub struct Site {
    config: SiteConfig,
    locale: LocaleStore,
    rtl: RtlFlag,
    theme: ThemeStore,
    data: DataStore,
    content_binding: Option<Subscription>,
}

impl Site {
    /// Stores backed by `host`, with content reloading on locale changes
    pub fn interactive(config: SiteConfig, host: Arc<dyn Host>, fetcher: Arc<dyn Fetcher>) -> Self {
        let mut site = Self::build(config, Some(host), fetcher);
        site.content_binding = Some(site.data.bind_locale(&site.locale));
        site
    }

    /// Stores without a host; nothing is persisted and nothing reloads
    pub fn prerender(config: SiteConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::build(config, None, fetcher)
    }

    fn build(config: SiteConfig, host: Option<Arc<dyn Host>>, fetcher: Arc<dyn Fetcher>) -> Self {
        let locale = LocaleStore::new(host.clone(), &config.storage);
        let rtl = RtlFlag::follow(&locale);
        let theme = ThemeStore::new(host, &config.storage);
        let data = DataStore::new(fetcher);
        Self {
            config,
            locale,
            rtl,
            theme,
            data,
            content_binding: None,
        }
    }

    /// Initialize locale and theme from storage and the URL
    pub fn start(&self) -> (Locale, Theme) {
        let locale = self.locale.init();
        let theme = self.theme.init();
        info!(%locale, %theme, rtl = self.rtl.get(), "Site started");
        (locale, theme)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn locale(&self) -> &LocaleStore {
        &self.locale
    }

    pub fn rtl(&self) -> &RtlFlag {
        &self.rtl
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn data(&self) -> &DataStore {
        &self.data
    }

    pub fn is_interactive(&self) -> bool {
        self.content_binding.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticFetcher;
    use crate::host::MemoryHost;
    use madeen_core::{Section, parse_site_config_str};
    use url::Url;

    fn interactive(host: &Arc<MemoryHost>) -> (Arc<StaticFetcher>, Site) {
        let fetcher = Arc::new(StaticFetcher::new());
        let dyn_fetcher: Arc<dyn Fetcher> = fetcher.clone();
        let dyn_host: Arc<dyn Host> = host.clone();
        let config = parse_site_config_str("").unwrap();
        (fetcher, Site::interactive(config, dyn_host, dyn_fetcher))
    }

    #[tokio::test]
    async fn test_interactive_start_restores_persisted_state() {
        let host = Arc::new(
            MemoryHost::new(Url::parse("http://localhost/maaden-constructions/").unwrap())
                .with_storage("madeen-language", "ar")
                .with_storage("madeen-theme", "madeen-dark"),
        );
        let (fetcher, site) = interactive(&host);

        assert_eq!(site.start(), (Locale::Ar, Theme::Dark));
        assert!(site.rtl().get());
        assert!(site.is_interactive());
        assert_eq!(host.attribute("dir").as_deref(), Some("rtl"));
        assert_eq!(host.url().query(), Some("lang=ar"));

        site.data().settle().await;
        // default-locale load at binding time, then the restored locale
        assert_eq!(fetcher.calls(), 14);
        assert_eq!(site.data().snapshot().loaded_sections().len(), 7);
    }

    #[tokio::test]
    async fn test_locale_toggle_reloads_content() {
        let host = Arc::new(MemoryHost::new(Url::parse("http://localhost/").unwrap()));
        let (fetcher, site) = interactive(&host);
        site.start();
        site.data().settle().await;
        assert_eq!(fetcher.calls(), 7);

        site.locale().toggle();
        site.data().settle().await;

        assert_eq!(fetcher.calls(), 14);
        assert!(site.rtl().get());
        for section in Section::ALL {
            assert_eq!(site.data().snapshot().get(section).unwrap()["lang"], "ar");
        }
    }

    #[tokio::test]
    async fn test_theme_is_independent_of_locale() {
        let host = Arc::new(MemoryHost::new(Url::parse("http://localhost/").unwrap()));
        let (fetcher, site) = interactive(&host);
        site.start();
        site.data().settle().await;

        site.theme().toggle();
        site.data().settle().await;

        assert_eq!(site.theme().get(), Theme::Dark);
        assert_eq!(site.locale().get(), Locale::En);
        assert_eq!(fetcher.calls(), 7);
    }

    #[tokio::test]
    async fn test_prerender_has_no_side_effects_or_reloads() {
        let fetcher = Arc::new(StaticFetcher::new());
        let dyn_fetcher: Arc<dyn Fetcher> = fetcher.clone();
        let site = Site::prerender(parse_site_config_str("").unwrap(), dyn_fetcher);

        assert_eq!(site.start(), (Locale::En, Theme::Light));
        site.locale().set(Locale::Ar);
        site.data().settle().await;

        assert!(!site.is_interactive());
        assert!(site.rtl().get());
        assert_eq!(fetcher.calls(), 0);
    }
}
