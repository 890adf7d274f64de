//! The environment the stores write their side effects into: key/value
//! storage, the root document element, and the address bar.

use madeen_core::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Storage, document and history access for an interactive session.
///
/// A store constructed without a host only changes its in-memory value.
pub trait Host: Send + Sync {
    fn storage_get(&self, key: &str) -> Result<Option<String>>;

    fn storage_set(&self, key: &str, value: &str) -> Result<()>;

    /// Set an attribute on the root document element
    fn set_root_attribute(&self, name: &str, value: &str) -> Result<()>;

    /// Replace the root document element's class name
    fn set_root_class(&self, class_name: &str) -> Result<()>;

    fn location(&self) -> Result<Url>;

    /// Replace the current history entry without navigating
    fn replace_location(&self, url: &Url) -> Result<()>;
}

/// Return `url` with query parameter `name` set to `value`.
///
/// The first existing occurrence is replaced in place and any later
/// duplicates are dropped; otherwise the pair is appended. Other parameters
/// keep their order.
pub fn with_query_param(url: &Url, name: &str, value: &str) -> Url {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;
    for (k, v) in url.query_pairs() {
        if k == name {
            if !replaced {
                pairs.push((k.into_owned(), value.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((k.into_owned(), v.into_owned()));
        }
    }
    if !replaced {
        pairs.push((name.to_string(), value.to_string()));
    }

    let mut next = url.clone();
    next.query_pairs_mut().clear().extend_pairs(pairs);
    next
}

/// First value of query parameter `name`, if present
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[derive(Debug)]
struct MemoryHostState {
    storage: HashMap<String, String>,
    attributes: BTreeMap<String, String>,
    class_name: String,
    location: Url,
    history_replacements: usize,
}

/// In-process [`Host`] used for scripted sessions and tests.
///
/// Storage reads, storage writes and document writes can each be made to
/// fail to exercise the stores' error handling.
#[derive(Debug)]
pub struct MemoryHost {
    state: Mutex<MemoryHostState>,
    fail_storage_reads: AtomicBool,
    fail_storage_writes: AtomicBool,
    fail_document_writes: AtomicBool,
}

impl MemoryHost {
    pub fn new(location: Url) -> Self {
        Self {
            state: Mutex::new(MemoryHostState {
                storage: HashMap::new(),
                attributes: BTreeMap::new(),
                class_name: String::new(),
                location,
                history_replacements: 0,
            }),
            fail_storage_reads: AtomicBool::new(false),
            fail_storage_writes: AtomicBool::new(false),
            fail_document_writes: AtomicBool::new(false),
        }
    }

    /// Pre-populate a storage entry, as left behind by a previous visit
    pub fn with_storage(self, key: &str, value: &str) -> Self {
        self.lock()
            .storage
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.lock().storage.get(key).cloned()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.lock().attributes.get(name).cloned()
    }

    pub fn class_name(&self) -> String {
        self.lock().class_name.clone()
    }

    pub fn url(&self) -> Url {
        self.lock().location.clone()
    }

    pub fn history_replacements(&self) -> usize {
        self.lock().history_replacements
    }

    pub fn fail_storage_reads(&self, fail: bool) {
        self.fail_storage_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_storage_writes(&self, fail: bool) {
        self.fail_storage_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_document_writes(&self, fail: bool) {
        self.fail_document_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryHostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_document(&self) -> Result<()> {
        if self.fail_document_writes.load(Ordering::SeqCst) {
            return Err(Error::Host("document is not writable".to_string()));
        }
        Ok(())
    }
}

impl Host for MemoryHost {
    fn storage_get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_storage_reads.load(Ordering::SeqCst) {
            return Err(Error::Host("storage is not readable".to_string()));
        }
        Ok(self.stored(key))
    }

    fn storage_set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_storage_writes.load(Ordering::SeqCst) {
            return Err(Error::Host(format!("quota exceeded writing '{}'", key)));
        }
        self.lock()
            .storage
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_root_attribute(&self, name: &str, value: &str) -> Result<()> {
        self.check_document()?;
        self.lock()
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_root_class(&self, class_name: &str) -> Result<()> {
        self.check_document()?;
        self.lock().class_name = class_name.to_string();
        Ok(())
    }

    fn location(&self) -> Result<Url> {
        Ok(self.url())
    }

    fn replace_location(&self, url: &Url) -> Result<()> {
        self.check_document()?;
        let mut state = self.lock();
        state.location = url.clone();
        state.history_replacements += 1;
        Ok(())
    }
}
