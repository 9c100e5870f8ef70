//! crates/suggestions_core/src/lock.rs
//!
//! A keyed, non-blocking in-flight marker. A second caller for a key that is
//! already running does not wait; it is told the key is busy and backs off.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::GenerationKey;

/// Tracks which generation keys currently have a run in flight.
///
/// State lives in memory only, so a process restart clears every marker.
#[derive(Debug, Default)]
pub struct GenerationLock {
    in_flight: Mutex<HashSet<String>>,
}

impl GenerationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self, key: &GenerationKey) -> bool {
        self.in_flight.lock().contains(&key.to_string())
    }

    /// Marks `key` as in flight. Calling it twice is harmless.
    pub fn start(&self, key: &GenerationKey) {
        self.in_flight.lock().insert(key.to_string());
    }

    /// Clears the in-flight marker for `key`, whether or not it was set.
    pub fn end(&self, key: &GenerationKey) {
        self.in_flight.lock().remove(&key.to_string());
    }

    /// Atomically marks `key` as in flight, returning a guard that clears it on drop.
    ///
    /// Returns `None` when another run already holds the key.
    pub fn try_acquire(self: &Arc<Self>, key: &GenerationKey) -> Option<GenerationGuard> {
        if !self.in_flight.lock().insert(key.to_string()) {
            return None;
        }
        Some(GenerationGuard {
            lock: Arc::clone(self),
            key: key.clone(),
        })
    }
}

/// Holds a key in the `GenerationLock` until dropped.
#[derive(Debug)]
pub struct GenerationGuard {
    lock: Arc<GenerationLock>,
    key: GenerationKey,
}

impl GenerationGuard {
    pub fn key(&self) -> &GenerationKey {
        &self.key
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        self.lock.end(&self.key);
    }
}
