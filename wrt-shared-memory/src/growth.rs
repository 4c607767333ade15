//! Page-granular growth of a [`ByteStore`].
//!
//! Growth never relocates storage. New pages are allocated and zeroed before
//! the grow lock is taken; under the lock they are installed into empty
//! directory slots and the new size is published with `Release`. Accessors
//! never take the lock.

use crate::{
    byte_store::{allocate_page, ByteStore},
    prelude::{Error, Result, Vec},
};

/// Serializes growth of a store against other growths.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthController;

impl GrowthController {
    /// Grow `store` by `delta_pages` and return the new size in pages.
    ///
    /// Fails, leaving the store unchanged, when the delta is negative or the
    /// result would exceed the store's maximum. A zero delta returns the
    /// current size.
    pub fn grow(store: &ByteStore, delta_pages: i64) -> Result<u32> {
        store.stats().record_grow_attempt();

        #[cfg(feature = "tracing")]
        let _span = crate::tracing::MemoryTrace::growing(store.size_in_pages(), delta_pages).entered();

        let result = Self::try_grow(store, delta_pages);
        if let Err(_error) = &result {
            store.stats().record_grow_failure();
            #[cfg(feature = "tracing")]
            crate::tracing::debug!(delta = %delta_pages, reason = %_error.message, "grow refused");
        }
        result
    }

    fn try_grow(store: &ByteStore, delta_pages: i64) -> Result<u32> {
        let delta = u32::try_from(delta_pages)
            .map_err(|_| Error::memory_grow_failed("Growth delta out of range"))?;
        if delta == 0 {
            return Ok(store.size_in_pages());
        }

        // Cheap rejection before allocating anything
        Self::target_pages(store, store.size_in_pages(), delta)?;

        let mut fresh = Vec::new();
        fresh
            .try_reserve_exact(delta as usize)
            .map_err(|_| Error::memory_grow_failed("Page list allocation failed"))?;
        for _ in 0..delta {
            fresh.push(allocate_page()?);
        }

        let _guard = store.grow_lock().lock();
        let current = store.size_in_pages();
        let target = Self::target_pages(store, current, delta)?;
        for (index, page) in (current..target).zip(fresh) {
            store.install(index, page)?;
        }
        store.publish(target);
        Ok(target)
    }

    fn target_pages(store: &ByteStore, current: u32, delta: u32) -> Result<u32> {
        current
            .checked_add(delta)
            .filter(|&target| target <= store.max_pages())
            .ok_or(Error::memory_grow_failed("Growth would exceed maximum size"))
    }
}
