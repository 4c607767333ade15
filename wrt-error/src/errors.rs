// WRT - wrt-error
// Module: WRT Error Types
// SW-REQ-ID: REQ_004
// SW-REQ-ID: REQ_ERROR_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

/// Error types for the shared linear memory
///
/// Every failure the memory subsystem can report is an [`Error`] value: a
/// category, a numeric code from [`codes`], and a static message. Errors are
/// `Copy` so they can cross agent boundaries without allocation.
use core::fmt;

use crate::codes;

/// `Error` categories for memory operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    /// Resource errors (growth, page installation)
    Resource    = 3,
    /// Validation errors (creation parameters, widths)
    Validation  = 5,
    /// System errors
    System      = 8,
    /// Concurrency errors
    Concurrency = 11,
    /// WebAssembly traps raised synchronously to the calling agent
    RuntimeTrap = 13,
}

/// Base trait for all error types
pub trait ErrorSource: fmt::Debug + Send + Sync {
    /// Get the error code
    fn code(&self) -> u16;

    /// Get the error message
    fn message(&self) -> &'static str;

    /// Get the error category
    fn category(&self) -> ErrorCategory;
}

/// WRT `Error` type
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Error {
    /// `Error` category
    pub category: ErrorCategory,
    /// `Error` code
    pub code:     u16,
    /// `Error` message
    pub message:  &'static str,
}

impl Error {
    /// Out of bounds trap
    pub const OUT_OF_BOUNDS_TRAP: Self = Self::new(
        ErrorCategory::RuntimeTrap,
        codes::MEMORY_OUT_OF_BOUNDS,
        "memory access out of bounds",
    );
    /// Unaligned atomic trap
    pub const UNALIGNED_ATOMIC_TRAP: Self = Self::new(
        ErrorCategory::RuntimeTrap,
        codes::UNALIGNED_ATOMIC_ACCESS,
        "unaligned atomic",
    );

    /// Create a new error.
    #[must_use]
    pub const fn new(category: ErrorCategory, code: u16, message: &'static str) -> Self {
        Self {
            category,
            code,
            message,
        }
    }

    /// Create an out-of-bounds trap
    #[must_use]
    pub const fn memory_out_of_bounds(message: &'static str) -> Self {
        Self::new(ErrorCategory::RuntimeTrap, codes::MEMORY_OUT_OF_BOUNDS, message)
    }

    /// Create an unaligned atomic access trap
    #[must_use]
    pub const fn unaligned_atomic_access(message: &'static str) -> Self {
        Self::new(
            ErrorCategory::RuntimeTrap,
            codes::UNALIGNED_ATOMIC_ACCESS,
            message,
        )
    }

    /// Create a configuration error
    #[must_use]
    pub const fn invalid_memory_config(message: &'static str) -> Self {
        Self::new(ErrorCategory::Validation, codes::INVALID_MEMORY_CONFIG, message)
    }

    /// Create a configuration error for a shared memory lacking a maximum
    #[must_use]
    pub const fn shared_memory_without_maximum(message: &'static str) -> Self {
        Self::new(
            ErrorCategory::Validation,
            codes::SHARED_MEMORY_WITHOUT_MAXIMUM,
            message,
        )
    }

    /// Create an invalid access width error
    #[must_use]
    pub const fn invalid_access_width(message: &'static str) -> Self {
        Self::new(ErrorCategory::Validation, codes::INVALID_ACCESS_WIDTH, message)
    }

    /// Create an error for sharing a memory that was created unshared
    #[must_use]
    pub const fn memory_not_shareable(message: &'static str) -> Self {
        Self::new(ErrorCategory::Validation, codes::MEMORY_NOT_SHAREABLE, message)
    }

    /// Create a growth failure
    #[must_use]
    pub const fn memory_grow_failed(message: &'static str) -> Self {
        Self::new(ErrorCategory::Resource, codes::MEMORY_GROW_FAILED, message)
    }

    /// Create a page installation failure
    #[must_use]
    pub const fn page_install_failed(message: &'static str) -> Self {
        Self::new(ErrorCategory::Concurrency, codes::PAGE_INSTALL_FAILED, message)
    }

    /// Check if this is a trap raised to the calling agent
    #[must_use]
    pub fn is_trap(&self) -> bool {
        self.category == ErrorCategory::RuntimeTrap
    }

    /// Check if this is an out-of-bounds trap
    #[must_use]
    pub fn is_out_of_bounds(&self) -> bool {
        self.is_trap() && self.code == codes::MEMORY_OUT_OF_BOUNDS
    }

    /// Check if this is a configuration error
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        self.category == ErrorCategory::Validation
            && matches!(
                self.code,
                codes::INVALID_MEMORY_CONFIG | codes::SHARED_MEMORY_WITHOUT_MAXIMUM
            )
    }

    /// Check if this is a growth failure
    #[must_use]
    pub fn is_grow_failure(&self) -> bool {
        self.category == ErrorCategory::Resource && self.code == codes::MEMORY_GROW_FAILED
    }

    /// Check if this is a resource error
    #[must_use]
    pub fn is_resource_error(&self) -> bool {
        self.category == ErrorCategory::Resource
    }

    /// Get the ASIL level of this error
    #[must_use]
    pub const fn asil_level(&self) -> &'static str {
        match self.category {
            ErrorCategory::RuntimeTrap | ErrorCategory::Concurrency => "ASIL-C",
            ErrorCategory::Resource => "ASIL-B",
            ErrorCategory::Validation => "ASIL-A",
            ErrorCategory::System => "QM",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "asil-c")]
        {
            write!(
                f,
                "[{:?}][E{:04X}][{}] {}",
                self.category,
                self.code,
                self.asil_level(),
                self.message
            )
        }
        #[cfg(not(feature = "asil-c"))]
        {
            write!(
                f,
                "[{:?}][E{:04X}] {}",
                self.category, self.code, self.message
            )
        }
    }
}

impl ErrorSource for Error {
    fn code(&self) -> u16 {
        self.code
    }

    fn message(&self) -> &'static str {
        self.message
    }

    fn category(&self) -> ErrorCategory {
        self.category
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::new(
            ErrorCategory::System,
            codes::SYSTEM_ERROR,
            "Formatting error (static)",
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
