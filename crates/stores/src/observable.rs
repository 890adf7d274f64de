//! Observable value container.
//!
//! A [`Writable`] holds one value and a list of subscribers. Subscribers are
//! called with the current value when they subscribe and again after every
//! change. Setting a value equal to the current one notifies nobody.
//!
//! Locks are never held while subscribers run, so a subscriber may read or
//! write the store that notified it. Changes are published one at a time in
//! the order they were made: a change made while a publish is running, by a
//! subscriber or by another thread, is queued and delivered by the thread
//! already publishing once every subscriber has seen the current round.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
    publication: Mutex<Publication<T>>,
}

/// Changes waiting to be delivered, and whether a thread is delivering them
struct Publication<T> {
    pending: VecDeque<T>,
    running: bool,
}

/// Shared, observable value. Clones refer to the same value.
pub struct Writable<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Writable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: RwLock::new(value),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                publication: Mutex::new(Publication {
                    pending: VecDeque::new(),
                    running: false,
                }),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.shared
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the value. Returns whether subscribers were notified.
    pub fn set(&self, value: T) -> bool {
        self.update(|_| value)
    }

    /// Compute the next value from the current one, then publish it if it changed.
    ///
    /// When another publish is already running the change is queued behind
    /// it and this call returns before subscribers have seen it.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        {
            let mut current = self
                .shared
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let next = f(&current);
            if *current == next {
                return false;
            }
            *current = next.clone();

            // Queued under the value lock so delivery order matches write order
            let mut publication = self.publication();
            publication.pending.push_back(next);
            if publication.running {
                return true;
            }
            publication.running = true;
        }

        self.drain();
        true
    }

    /// Register a subscriber. It runs immediately with the current value.
    ///
    /// The subscriber stays registered until the returned [`Subscription`]
    /// is dropped.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback<T> = Arc::new(f);
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&callback)));

        callback(&self.get());

        let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared
                    .subscribers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(sid, _)| *sid != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn publication(&self) -> MutexGuard<'_, Publication<T>> {
        self.shared
            .publication
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver queued changes until none are left. Only one thread drains
    /// at a time.
    fn drain(&self) {
        let _reset = ResetOnPanic(&self.shared.publication);
        loop {
            let next = {
                let mut publication = self.publication();
                match publication.pending.pop_front() {
                    Some(value) => value,
                    None => {
                        publication.running = false;
                        return;
                    }
                }
            };
            self.notify(&next);
        }
    }

    fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = self
            .shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(value);
        }
    }
}

/// Lets a later change start publishing again if a subscriber panics
struct ResetOnPanic<'a, T>(&'a Mutex<Publication<T>>);

impl<T> Drop for ResetOnPanic<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .running = false;
        }
    }
}

/// Handle to a registered subscriber; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Keep the subscriber registered for as long as the store lives
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
