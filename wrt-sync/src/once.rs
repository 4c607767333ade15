// WRT - wrt-sync
// Module: OnceCell - A one-time initialization primitive
// SW-REQ-ID: REQ_CONCURRENCY_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! A cell that can be written at most once.
//!
//! `WrtOnce<T>` moves through three states: empty, being written, ready.
//! Readers only ever observe ready values, and the write that made a value
//! ready happens-before every read that observes it. Installing never blocks;
//! only `get_or_init` waits, and only for a concurrent installer that has
//! already claimed the cell.

use wrt_error::{Error, Result};

use crate::prelude::{fmt, spin_loop, AtomicU8, MaybeUninit, Ordering, UnsafeCell};

const EMPTY: u8 = 0;
const WRITING: u8 = 1;
const READY: u8 = 2;

/// A synchronization primitive which can be written to only once.
///
/// This type is analogous to `std::sync::OnceLock`, but usable without `std`.
pub struct WrtOnce<T> {
    state: AtomicU8,
    data: UnsafeCell<MaybeUninit<T>>,
}

/// # Safety
/// `T` is moved into the cell by exactly one thread, so `T: Send` suffices.
unsafe impl<T: Send> Send for WrtOnce<T> {}

/// # Safety
/// After the `READY` transition the value is only reached through `&T`, so
/// sharing the cell shares `&T` across threads (`T: Sync`), and the installing
/// thread may differ from the dropping one (`T: Send`).
unsafe impl<T: Send + Sync> Sync for WrtOnce<T> {}

impl<T> WrtOnce<T> {
    /// Creates a new, empty `WrtOnce`.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { state: AtomicU8::new(EMPTY), data: UnsafeCell::new(MaybeUninit::uninit()) }
    }

    /// Returns `true` once a value has been fully written.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// Gets a reference to the value if it is initialized.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        if self.is_initialized() {
            // # Safety
            // The Acquire load observed READY, which is stored with Release
            // only after the value was written.
            Some(unsafe { self.get_unchecked() })
        } else {
            None
        }
    }

    /// Stores `value` if the cell is empty.
    ///
    /// Returns the value back if another caller claimed the cell first.
    pub fn set(&self, value: T) -> core::result::Result<&T, T> {
        if self
            .state
            .compare_exchange(EMPTY, WRITING, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return Err(value);
        }
        // # Safety
        // Winning the EMPTY -> WRITING exchange grants exclusive write access;
        // readers ignore the cell until READY is published.
        unsafe {
            (*self.data.get()).write(value);
        }
        self.state.store(READY, Ordering::Release);
        // # Safety
        // Written above by this thread.
        Ok(unsafe { self.get_unchecked() })
    }

    /// Stores `value`, failing with a concurrency error if the cell is
    /// already claimed. The rejected value is dropped.
    pub fn install(&self, value: T) -> Result<&T> {
        self.set(value)
            .map_err(|_| Error::page_install_failed("Cell already initialized"))
    }

    /// Gets the value, initializing it with `f` if the cell is empty.
    ///
    /// If another thread is mid-way through installing a value, this waits
    /// for it and `f` is not called.
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get() {
            return value;
        }
        match self.set(f()) {
            Ok(value) => value,
            Err(_lost) => {
                while self.state.load(Ordering::Acquire) != READY {
                    spin_loop();
                }
                // # Safety
                // READY observed with Acquire.
                unsafe { self.get_unchecked() }
            }
        }
    }

    /// # Safety
    ///
    /// Caller must have observed `READY` with `Acquire` ordering, or be the
    /// thread that wrote the value.
    #[inline]
    unsafe fn get_unchecked(&self) -> &T {
        unsafe { (*self.data.get()).assume_init_ref() }
    }
}

impl<T> Default for WrtOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for WrtOnce<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => f.debug_struct("WrtOnce").field("data", v).finish(),
            None => f.debug_struct("WrtOnce").field("data", &"<uninitialized>").finish(),
        }
    }
}

impl<T> Drop for WrtOnce<T> {
    fn drop(&mut self) {
        if *self.state.get_mut() == READY {
            // # Safety
            // `&mut self` is exclusive and the value was fully written.
            unsafe {
                (*self.data.get_mut()).assume_init_drop();
            }
        }
    }
}
