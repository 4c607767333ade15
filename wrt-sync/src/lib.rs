// WRT - wrt-sync
// Module: Synchronization primitives
// SW-REQ-ID: REQ_CONCURRENCY_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![no_std]
#![doc = "Synchronization primitives (Mutex, set-once cell) for the WRT shared linear memory."]
#![warn(clippy::missing_panics_doc)]

// Conditionally use `std` for tests or specific features
#[cfg(feature = "std")]
extern crate std;

pub mod mutex;
pub mod once;
pub mod prelude;

pub use mutex::*;
pub use once::*;
