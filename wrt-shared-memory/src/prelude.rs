//! Prelude module for wrt-shared-memory
//!
//! Unified imports for std and no_std builds. Page storage always needs
//! `alloc`, so the collection types come from there in both modes.

pub use alloc::{boxed::Box, sync::Arc, vec::Vec};
pub use core::{
    fmt,
    fmt::Debug,
    sync::atomic::{AtomicU32, AtomicUsize, Ordering},
};

pub use wrt_error::{codes, Error, ErrorCategory, Result};
pub use wrt_sync::{WrtMutex, WrtOnce};
