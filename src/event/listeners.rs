//! Keyed callback sets
//!
//! A small typed pub/sub primitive: callbacks are registered under a
//! string key per event, and a key that is already present is rejected
//! rather than replaced, so the same subscriber is never invoked twice
//! for one event.

/// A set of callbacks for one event, keyed by subscriber name.
///
/// Generic over the (usually `dyn FnMut(..)`) callable type so callbacks
/// can borrow their arguments. Insertion order is preserved for emission.
pub struct CallbackSet<F: ?Sized> {
    entries: Vec<(&'static str, Box<F>)>,
}

impl<F: ?Sized> CallbackSet<F> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a callback under `key`.
    ///
    /// Returns `false` (leaving the set unchanged) when `key` is already
    /// registered: duplicates are not added twice.
    pub fn add(&mut self, key: &'static str, callback: Box<F>) -> bool {
        if self.has(key) {
            return false;
        }
        self.entries.push((key, callback));
        true
    }

    /// Check whether `key` is registered
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Remove the callback registered under `key`.
    ///
    /// Returns `true` if a callback was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    /// Invoke `invoke` with every registered callback, in insertion order
    pub fn emit(&mut self, mut invoke: impl FnMut(&mut F)) {
        for (_, callback) in &mut self.entries {
            invoke(callback);
        }
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: ?Sized> Default for CallbackSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> std::fmt::Debug for CallbackSet<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSet")
            .field("keys", &self.entries.iter().map(|(k, _)| *k).collect::<Vec<_>>())
            .finish()
    }
}
