// WRT - wrt-error
// Module: WRT Error Handling
// SW-REQ-ID: REQ_004
// SW-REQ-ID: REQ_ERROR_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! WRT Error handling library
//!
//! Error types for the WRT shared linear memory. Every failure is a small
//! `Copy` value carrying a category, a numeric code and a static message.
//!
//! # Error Categories
//!
//! ## Traps (1000-1099)
//! - Out-of-bounds memory access
//! - Unaligned atomic access
//!
//! ## Validation Errors (2000-2099)
//! - Invalid initial/maximum page counts
//! - Shared memory without a maximum
//! - Unsupported access widths
//! - Sharing an unshared memory
//!
//! ## Resource Errors (3000-3099)
//! - Rejected memory growth
//!
//! # Usage
//!
//! ```
//! use wrt_error::{
//!     codes,
//!     Error,
//!     ErrorCategory,
//! };
//!
//! let trap = Error::memory_out_of_bounds("atomic.rmw.add out of bounds");
//! assert!(trap.is_trap());
//! assert_eq!(trap.code, codes::MEMORY_OUT_OF_BOUNDS);
//!
//! let grow = Error::new(
//!     ErrorCategory::Resource,
//!     codes::MEMORY_GROW_FAILED,
//!     "exceeds maximum",
//! );
//! assert!(grow.is_grow_failure());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)] // Rule 2
#![deny(clippy::all)]
#![deny(clippy::perf)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Error codes for wrt
pub mod codes;
/// Error and error handling types
pub mod errors;

pub mod prelude;

// Re-export key types
pub use errors::{Error, ErrorCategory, ErrorSource};

/// A specialized `Result` type for WRT operations.
///
/// This type alias uses `wrt_error::Error` as the error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Trait for mapping a value onto an [`ErrorCategory`]
pub trait ToErrorCategory {
    /// Convert to an `ErrorCategory`
    fn to_category(&self) -> ErrorCategory;
}

impl ToErrorCategory for Error {
    fn to_category(&self) -> ErrorCategory {
        self.category
    }
}
