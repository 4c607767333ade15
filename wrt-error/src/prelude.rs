// WRT - wrt-error
// Module: WRT Error Prelude
// SW-REQ-ID: REQ_004
// SW-REQ-ID: REQ_ERROR_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Prelude module for wrt-error
//!
//! Re-exports the error types and codes so dependent crates can pull them in
//! with a single `use wrt_error::prelude::*`.

pub use core::fmt::{
    Debug,
    Display,
};

pub use crate::{
    codes,
    Error,
    ErrorCategory,
    ErrorSource,
    Result,
    ToErrorCategory,
};
