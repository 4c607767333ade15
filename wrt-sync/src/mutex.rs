// WRT - wrt-sync
// Module: Mutex
// SW-REQ-ID: REQ_CONCURRENCY_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Mutual exclusion for short critical sections.
//!
//! With the `std` feature `WrtMutex` is a thin wrapper over
//! `parking_lot::Mutex`, which parks contended threads. Without it the mutex
//! is a spinlock built on a single `AtomicBool`.

#[cfg(not(feature = "std"))]
use crate::prelude::{spin_loop, AtomicBool, Deref, DerefMut, Ordering, UnsafeCell};
use crate::prelude::fmt;

/// A non-reentrant mutex for short critical sections.
#[cfg(feature = "std")]
pub struct WrtMutex<T: ?Sized> {
    inner: parking_lot::Mutex<T>,
}

/// A non-reentrant spinlock mutex suitable for `no_std` environments.
///
/// WARNING: contended waiters spin. Only hold it around bounded work.
#[cfg(not(feature = "std"))]
pub struct WrtMutex<T: ?Sized> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

/// A guard that provides mutable access to the data protected by a `WrtMutex`.
#[cfg(feature = "std")]
pub type WrtMutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;

/// A guard that provides mutable access to the data protected by a `WrtMutex`.
///
/// When the guard is dropped, the mutex is unlocked.
#[cfg(not(feature = "std"))]
#[clippy::has_significant_drop]
pub struct WrtMutexGuard<'a, T: ?Sized + 'a> {
    mutex: &'a WrtMutex<T>,
}

/// # Safety
/// Access to the `UnsafeCell` data is protected by the atomic `locked` flag,
/// so only one thread touches `T` at a time.
#[cfg(not(feature = "std"))]
unsafe impl<T: ?Sized + Send> Send for WrtMutex<T> {}
/// # Safety
/// All accesses to the data go through the lock.
#[cfg(not(feature = "std"))]
unsafe impl<T: ?Sized + Send> Sync for WrtMutex<T> {}

#[cfg(feature = "std")]
impl<T> WrtMutex<T> {
    /// Creates a new `WrtMutex` protecting the given data.
    #[inline]
    pub const fn new(data: T) -> Self {
        Self { inner: parking_lot::const_mutex(data) }
    }

    /// Consumes the mutex, returning the protected data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

#[cfg(feature = "std")]
impl<T: ?Sized> WrtMutex<T> {
    /// Acquires the lock, parking the thread until it is available.
    #[inline]
    pub fn lock(&self) -> WrtMutexGuard<'_, T> {
        self.inner.lock()
    }

    /// Attempts to acquire the lock without blocking.
    #[inline]
    pub fn try_lock(&self) -> Option<WrtMutexGuard<'_, T>> {
        self.inner.try_lock()
    }

    /// Returns `true` if some thread currently holds the lock.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

#[cfg(not(feature = "std"))]
impl<T> WrtMutex<T> {
    /// Creates a new `WrtMutex` protecting the given data.
    #[inline]
    pub const fn new(data: T) -> Self {
        Self { locked: AtomicBool::new(false), data: UnsafeCell::new(data) }
    }

    /// Consumes the mutex, returning the protected data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

#[cfg(not(feature = "std"))]
impl<T: ?Sized> WrtMutex<T> {
    /// Acquires the lock, spinning until it is available.
    #[inline]
    pub fn lock(&self) -> WrtMutexGuard<'_, T> {
        // Acquire on success so reads of the data happen after the lock is held.
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
        WrtMutexGuard { mutex: self }
    }

    /// Attempts to acquire the lock without spinning.
    #[inline]
    pub fn try_lock(&self) -> Option<WrtMutexGuard<'_, T>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| WrtMutexGuard { mutex: self })
    }

    /// Returns `true` if some thread currently holds the lock.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for WrtMutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never block inside Debug.
        match self.try_lock() {
            Some(guard) => f.debug_struct("WrtMutex").field("data", &&*guard).finish(),
            None => f.debug_struct("WrtMutex").field("data", &"<locked>").finish(),
        }
    }
}

impl<T: Default> Default for WrtMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(not(feature = "std"))]
impl<T: ?Sized> Deref for WrtMutexGuard<'_, T> {
    type Target = T;
    #[inline]
    fn deref(&self) -> &Self::Target {
        // # Safety
        // A guard only exists while the mutex is locked by its holder.
        unsafe { &*self.mutex.data.get() }
    }
}

#[cfg(not(feature = "std"))]
impl<T: ?Sized> DerefMut for WrtMutexGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        // # Safety
        // A guard only exists while the mutex is locked by its holder, so the
        // access is exclusive.
        unsafe { &mut *self.mutex.data.get() }
    }
}

#[cfg(not(feature = "std"))]
impl<T: ?Sized> Drop for WrtMutexGuard<'_, T> {
    /// Releases the lock when the guard goes out of scope.
    #[inline]
    fn drop(&mut self) {
        // Release publishes every write made under the lock.
        self.mutex.locked.store(false, Ordering::Release);
    }
}
