use crate::host::{Host, query_param, with_query_param};
use crate::observable::{Subscription, Writable};
use madeen_core::{Locale, Result, StorageKeys};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// URL query parameter carrying the active locale
pub const LANG_PARAM: &str = "lang";

/// Where `init` found the locale it settled on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    Storage,
    Url,
    Default,
}

/// Holds the active locale and mirrors it into storage, the root element's
/// `lang`/`dir` attributes and the `lang` query parameter.
#[derive(Clone)]
pub struct LocaleStore {
    value: Writable<Locale>,
    host: Option<Arc<dyn Host>>,
    storage_key: String,
}

impl LocaleStore {
    pub fn new(host: Option<Arc<dyn Host>>, keys: &StorageKeys) -> Self {
        Self {
            value: Writable::new(Locale::default()),
            host,
            storage_key: keys.locale.clone(),
        }
    }

    pub fn get(&self) -> Locale {
        self.value.get()
    }

    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&Locale) + Send + Sync + 'static,
    {
        self.value.subscribe(f)
    }

    /// Resolve the initial locale: a recognized stored value, then a
    /// recognized `lang` query parameter, then English.
    ///
    /// The winner is persisted, published, and written to the document and
    /// the URL. Any host failure falls back to English.
    pub fn init(&self) -> Locale {
        let Some(host) = self.host.as_deref() else {
            return self.get();
        };

        match self.resolve_and_apply(host) {
            Ok(locale) => locale,
            Err(e) => {
                error!(error = %e, "Error initializing locale");
                self.value.set(Locale::En);
                Locale::En
            }
        }
    }

    /// Apply side effects for `locale`, then publish it. Side effect
    /// failures are logged and never block publication.
    pub fn set(&self, locale: Locale) {
        if let Some(host) = self.host.as_deref() {
            match self.apply(host, locale) {
                Ok(()) => info!(locale = %locale, "Locale set"),
                Err(e) => warn!(locale = %locale, error = %e, "Error setting locale"),
            }
        }
        self.value.set(locale);
    }

    pub fn toggle(&self) -> Locale {
        let next = self.get().toggled();
        if let Some(host) = self.host.as_deref() {
            match self.apply(host, next) {
                Ok(()) => info!(locale = %next, "Locale toggled"),
                Err(e) => warn!(locale = %next, error = %e, "Error toggling locale"),
            }
        }
        self.value.set(next);
        next
    }

    fn resolve_and_apply(&self, host: &dyn Host) -> Result<Locale> {
        let (locale, source) = self.resolve(host)?;
        match source {
            LocaleSource::Storage => info!(locale = %locale, "Locale initialized from storage"),
            LocaleSource::Url => info!(locale = %locale, "Locale initialized from URL parameter"),
            LocaleSource::Default => info!("Locale initialized with default English"),
        }

        host.storage_set(&self.storage_key, locale.as_str())?;
        self.value.set(locale);
        apply_document(host, locale)?;
        sync_url(host, locale)?;
        Ok(locale)
    }

    fn resolve(&self, host: &dyn Host) -> Result<(Locale, LocaleSource)> {
        let stored = host.storage_get(&self.storage_key)?;
        if let Some(locale) = stored.as_deref().and_then(Locale::from_tag) {
            return Ok((locale, LocaleSource::Storage));
        }
        if let Some(raw) = &stored {
            debug!(stored = %raw, "Ignoring unrecognized stored locale");
        }

        let url = host.location()?;
        if let Some(locale) = query_param(&url, LANG_PARAM)
            .as_deref()
            .and_then(Locale::from_tag)
        {
            return Ok((locale, LocaleSource::Url));
        }

        Ok((Locale::default(), LocaleSource::Default))
    }

    fn apply(&self, host: &dyn Host, locale: Locale) -> Result<()> {
        host.storage_set(&self.storage_key, locale.as_str())?;
        apply_document(host, locale)?;
        sync_url(host, locale)
    }
}

fn apply_document(host: &dyn Host, locale: Locale) -> Result<()> {
    host.set_root_attribute("lang", locale.as_str())?;
    host.set_root_attribute("dir", locale.direction().as_str())
}

fn sync_url(host: &dyn Host, locale: Locale) -> Result<()> {
    let url = host.location()?;
    host.replace_location(&with_query_param(&url, LANG_PARAM, locale.as_str()))
}
