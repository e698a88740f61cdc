//! Single-slot device cache.
//!
//! Remembers the last printer that completed a print so the next print
//! skips device selection. Cleared on any failure downstream of using the
//! cached handle, guaranteeing the next attempt re-discovers instead of
//! retrying a known-bad device forever.

use std::sync::{Mutex, PoisonError};

/// One remembered device handle, at most.
///
/// An explicit injected store rather than a hidden global: the component
/// wiring up the dispatcher decides its scope (per process, per session,
/// per printer target). Interior locking only guards the slot itself;
/// serializing whole concurrent print attempts remains the caller's job.
#[derive(Debug)]
pub struct DeviceCache<D> {
    slot: Mutex<Option<D>>,
}

impl<D: Clone> DeviceCache<D> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn get(&self) -> Option<D> {
        self.lock().clone()
    }

    pub fn set(&self, device: D) {
        *self.lock() = Some(device);
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<D>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: Clone> Default for DeviceCache<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_empty() {
        let cache: DeviceCache<u32> = DeviceCache::new();
        assert_eq!(None, cache.get());
    }

    #[test]
    fn set_then_get_returns_the_device() {
        let cache = DeviceCache::new();
        cache.set(7);
        assert_eq!(Some(7), cache.get());
    }

    #[test]
    fn set_replaces_the_previous_device() {
        let cache = DeviceCache::new();
        cache.set(7);
        cache.set(9);
        assert_eq!(Some(9), cache.get());
    }

    #[test]
    fn clear_empties_the_slot() {
        let cache = DeviceCache::new();
        cache.set(7);
        cache.clear();
        assert_eq!(None, cache.get());
    }
}
