//! Prelude module for wrt-sync
//!
//! Re-exports the core items the primitives are built from, plus the
//! primitives themselves under their short names.

pub use core::{
    cell::UnsafeCell,
    fmt,
    hint::spin_loop,
    mem::MaybeUninit,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicBool, AtomicU8, Ordering},
};

pub use crate::{WrtMutex as Mutex, WrtOnce as Once};
