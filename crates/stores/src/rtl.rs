use crate::locale::LocaleStore;
use crate::observable::{Subscription, Writable};
use madeen_core::Locale;

/// Read-only flag that is true exactly when the locale is right-to-left
pub struct RtlFlag {
    value: Writable<bool>,
    _binding: Subscription,
}

impl RtlFlag {
    /// Follow `locale` for as long as the flag is alive.
    ///
    /// The flag is recomputed from the store's current value on every
    /// publish rather than from the published one.
    pub fn follow(locale: &LocaleStore) -> Self {
        let value = Writable::new(false);
        let target = value.clone();
        let source = locale.clone();
        let binding = locale.subscribe(move |_: &Locale| {
            target.set(source.get().is_rtl());
        });
        Self {
            value,
            _binding: binding,
        }
    }

    pub fn get(&self) -> bool {
        self.value.get()
    }

    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.value.subscribe(f)
    }
}
