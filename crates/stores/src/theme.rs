use crate::host::Host;
use crate::observable::{Subscription, Writable};
use madeen_core::{Result, StorageKeys, Theme};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Root element attribute carrying the theme token
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Holds the active theme and mirrors it into storage, the `data-theme`
/// attribute and the root class name. Never touches the URL.
#[derive(Clone)]
pub struct ThemeStore {
    value: Writable<Theme>,
    host: Option<Arc<dyn Host>>,
    storage_key: String,
}

impl ThemeStore {
    pub fn new(host: Option<Arc<dyn Host>>, keys: &StorageKeys) -> Self {
        Self {
            value: Writable::new(Theme::default()),
            host,
            storage_key: keys.theme.clone(),
        }
    }

    pub fn get(&self) -> Theme {
        self.value.get()
    }

    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&Theme) + Send + Sync + 'static,
    {
        self.value.subscribe(f)
    }

    /// Apply the stored theme if it is recognized; otherwise apply and
    /// persist the light default.
    pub fn init(&self) -> Theme {
        let Some(host) = self.host.as_deref() else {
            return self.get();
        };

        let stored = match host.storage_get(&self.storage_key) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Error reading stored theme");
                None
            }
        };

        let theme = match stored.as_deref().and_then(Theme::from_token) {
            Some(theme) => {
                info!(theme = %theme, "Theme initialized from storage");
                if let Err(e) = apply_document(host, theme) {
                    warn!(theme = %theme, error = %e, "Error applying theme");
                }
                theme
            }
            None => {
                if let Some(raw) = &stored {
                    debug!(stored = %raw, "Ignoring unrecognized stored theme");
                }
                let theme = Theme::default();
                if let Err(e) = self.apply(host, theme) {
                    warn!(theme = %theme, error = %e, "Error applying default theme");
                }
                theme
            }
        };

        self.value.set(theme);
        theme
    }

    pub fn set(&self, theme: Theme) {
        if let Some(host) = self.host.as_deref() {
            if let Err(e) = self.apply(host, theme) {
                warn!(theme = %theme, error = %e, "Error setting theme");
            }
        }
        self.value.set(theme);
    }

    pub fn toggle(&self) -> Theme {
        let next = self.get().toggled();
        self.set(next);
        next
    }

    /// Raw in-memory update; no storage or document side effects
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&Theme) -> Theme,
    {
        self.value.update(f);
    }

    fn apply(&self, host: &dyn Host, theme: Theme) -> Result<()> {
        host.storage_set(&self.storage_key, theme.token())?;
        apply_document(host, theme)
    }
}

fn apply_document(host: &dyn Host, theme: Theme) -> Result<()> {
    host.set_root_attribute(THEME_ATTRIBUTE, theme.token())?;
    host.set_root_class(&theme.class_name())
}
