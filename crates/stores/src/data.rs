//! Section content, fetched per locale and cached in a shared store.
//!
//! Reloads triggered by locale changes are not cancelled. When two reloads
//! overlap, each section ends up holding whichever retrieval finished last.

use crate::fetch::Fetcher;
use crate::locale::LocaleStore;
use crate::observable::{Subscription, Writable};
use futures::future::join_all;
use madeen_core::{Locale, Result, Section, parse_content_document};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Loaded content per section. A section that is absent has not been
/// loaded yet, failed to load, or was reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageDataSet {
    sections: BTreeMap<Section, Value>,
}

impl PageDataSet {
    pub fn get(&self, section: Section) -> Option<&Value> {
        self.sections.get(&section)
    }

    pub fn is_loaded(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    pub fn loaded_sections(&self) -> Vec<Section> {
        self.sections.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn with(&self, section: Section, value: Value) -> Self {
        let mut next = self.clone();
        next.sections.insert(section, value);
        next
    }

    fn without(&self, section: Section) -> Self {
        let mut next = self.clone();
        next.sections.remove(&section);
        next
    }
}

/// Shared store of section content
#[derive(Clone)]
pub struct DataStore {
    state: Writable<PageDataSet>,
    fetcher: Arc<dyn Fetcher>,
    reloads: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl DataStore {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            state: Writable::new(PageDataSet::default()),
            fetcher,
            reloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn snapshot(&self) -> PageDataSet {
        self.state.get()
    }

    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&PageDataSet) + Send + Sync + 'static,
    {
        self.state.subscribe(f)
    }

    /// Fetch one section, keep the slice for `locale`, and return it.
    ///
    /// Failures are logged and yield `None`; the stored section is left
    /// as it was.
    pub async fn load_data(&self, section: Section, locale: Locale) -> Option<Value> {
        match self.fetch_slice(section, locale).await {
            Ok(data) => {
                self.state.update(|current| current.with(section, data.clone()));
                debug!(%section, %locale, "Section data loaded");
                Some(data)
            }
            Err(e) => {
                error!(%section, %locale, error = %e, "Error loading section data");
                None
            }
        }
    }

    /// Load every section concurrently and wait for all of them to settle
    pub async fn load_all_data(&self, locale: Locale) {
        let results = join_all(
            Section::ALL
                .into_iter()
                .map(|section| self.load_data(section, locale)),
        )
        .await;

        let loaded = results.iter().filter(|r| r.is_some()).count();
        info!(%locale, loaded, total = Section::ALL.len(), "All data loaded for locale");
    }

    /// Fetch one section for `locale` without touching the shared store
    pub async fn get_data(&self, section: Section, locale: Locale) -> Option<Value> {
        match self.fetch_slice(section, locale).await {
            Ok(data) => Some(data),
            Err(e) => {
                error!(%section, %locale, error = %e, "Error getting section data");
                None
            }
        }
    }

    /// Clear every section
    pub fn reset(&self) {
        self.state.set(PageDataSet::default());
    }

    /// Clear one section, leaving the others alone
    pub fn reset_type(&self, section: Section) {
        self.state.update(|current| current.without(section));
    }

    /// Reload all sections whenever `locale` publishes, starting with its
    /// current value. Reloads run as tasks on the current Tokio runtime.
    ///
    /// The binding lasts until the returned subscription is dropped.
    pub fn bind_locale(&self, locale: &LocaleStore) -> Subscription {
        let store = self.clone();
        locale.subscribe(move |l: &Locale| store.spawn_reload(*l))
    }

    /// Wait for every reload spawned so far, including ones spawned while
    /// waiting
    pub async fn settle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = self
                .reloads
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .drain(..)
                .collect();
            if pending.is_empty() {
                break;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Content reload task failed");
                }
            }
        }
    }

    fn spawn_reload(&self, locale: Locale) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(%locale, "No async runtime; skipping content reload");
            return;
        };

        let store = self.clone();
        let handle = runtime.spawn(async move { store.load_all_data(locale).await });

        let mut reloads = self.reloads.lock().unwrap_or_else(PoisonError::into_inner);
        reloads.retain(|h| !h.is_finished());
        reloads.push(handle);
    }

    async fn fetch_slice(&self, section: Section, locale: Locale) -> Result<Value> {
        let body = self.fetcher.fetch(section).await?;
        let document = parse_content_document(&body)?;
        Ok(document.select(locale))
    }
}
