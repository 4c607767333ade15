//! Operation counters for a memory.
//!
//! Counters are shared by every agent holding the memory and are updated with
//! `Relaxed` ordering; they are diagnostics, not synchronization.

use crate::prelude::{AtomicUsize, Ordering};

/// Live counters owned by a `ByteStore`
#[derive(Debug, Default)]
pub struct MemoryStats {
    rmw_operations:      AtomicUsize,
    plain_accesses:      AtomicUsize,
    out_of_bounds_traps: AtomicUsize,
    unaligned_traps:     AtomicUsize,
    grow_attempts:       AtomicUsize,
    grow_failures:       AtomicUsize,
}

/// Point-in-time copy of [`MemoryStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStatsSnapshot {
    /// Completed atomic read-modify-write operations
    pub rmw_operations:      usize,
    /// Completed plain loads, stores and range copies
    pub plain_accesses:      usize,
    /// Accesses rejected by the bounds check
    pub out_of_bounds_traps: usize,
    /// Atomic accesses rejected for misalignment
    pub unaligned_traps:     usize,
    /// Growth requests received, including zero-delta queries
    pub grow_attempts:       usize,
    /// Growth requests refused
    pub grow_failures:       usize,
}

impl MemoryStats {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            rmw_operations:      AtomicUsize::new(0),
            plain_accesses:      AtomicUsize::new(0),
            out_of_bounds_traps: AtomicUsize::new(0),
            unaligned_traps:     AtomicUsize::new(0),
            grow_attempts:       AtomicUsize::new(0),
            grow_failures:       AtomicUsize::new(0),
        }
    }

    pub(crate) fn record_rmw(&self) {
        self.rmw_operations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_plain_access(&self) {
        self.plain_accesses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_out_of_bounds(&self) {
        self.out_of_bounds_traps.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unaligned(&self) {
        self.unaligned_traps.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_grow_attempt(&self) {
        self.grow_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_grow_failure(&self) {
        self.grow_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> MemoryStatsSnapshot {
        MemoryStatsSnapshot {
            rmw_operations:      self.rmw_operations.load(Ordering::Relaxed),
            plain_accesses:      self.plain_accesses.load(Ordering::Relaxed),
            out_of_bounds_traps: self.out_of_bounds_traps.load(Ordering::Relaxed),
            unaligned_traps:     self.unaligned_traps.load(Ordering::Relaxed),
            grow_attempts:       self.grow_attempts.load(Ordering::Relaxed),
            grow_failures:       self.grow_failures.load(Ordering::Relaxed),
        }
    }
}

impl MemoryStatsSnapshot {
    /// Total traps raised, of any kind
    #[must_use]
    pub fn total_traps(&self) -> usize {
        self.out_of_bounds_traps + self.unaligned_traps
    }

    /// Growth requests that succeeded
    #[must_use]
    pub fn successful_grows(&self) -> usize {
        self.grow_attempts.saturating_sub(self.grow_failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        assert_eq!(MemoryStats::new().snapshot(), MemoryStatsSnapshot::default());
    }

    #[test]
    fn snapshot_reflects_recorded_events() {
        let stats = MemoryStats::new();
        stats.record_rmw();
        stats.record_rmw();
        stats.record_out_of_bounds();
        stats.record_unaligned();
        stats.record_grow_attempt();
        stats.record_grow_attempt();
        stats.record_grow_failure();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.rmw_operations, 2);
        assert_eq!(snapshot.total_traps(), 2);
        assert_eq!(snapshot.successful_grows(), 1);
    }
}
