// WRT - wrt-shared-memory
// Module: Shared linear memory
// SW-REQ-ID: REQ_MEM_001
// SW-REQ-ID: REQ_CONCURRENCY_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Shared WebAssembly linear memory with atomic read-modify-write operations.
//!
//! A [`Memory`] is a growable, page-granular byte store that several
//! execution agents may hold at once. Agents issue atomic RMW operations
//! (`add`, `sub`, `and`, `or`, `xor` at 8, 16 and 32 bits) while any agent
//! may grow the memory concurrently.
//!
//! # Components
//!
//! - [`ByteStore`]: page directory, current/maximum size, location handles
//! - [`BoundsChecker`]: validates an access against one size snapshot
//! - [`AtomicRmwEngine`]: performs one indivisible RMW, returns the prior value
//! - [`GrowthController`]: grows by whole pages without moving existing ones
//!
//! # Usage
//!
//! ```
//! use wrt_shared_memory::{Memory, MemoryConfig};
//!
//! let memory = Memory::new(MemoryConfig::shared(1, 10)?)?;
//! memory.store_u32(8, 41)?;
//! assert_eq!(memory.atomic_add32(8, 1)?, 41);
//! assert_eq!(memory.load_u32(8)?, 42);
//!
//! let agent = memory.share()?;
//! assert_eq!(agent.grow_memory(2), 1);
//! assert_eq!(memory.size_in_pages(), 3);
//! # Ok::<(), wrt_error::Error>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Page storage is always heap allocated
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use wrt_error::{Error, Result};

pub mod atomic_execution;
pub mod bounds;
pub mod byte_store;
pub mod growth;
pub mod memory;
pub mod memory_config;
pub mod prelude;
pub mod stats;

#[cfg(feature = "tracing")]
pub mod tracing;

pub use atomic_execution::{AtomicOperationRequest, AtomicRmwEngine, RmwOp};
pub use bounds::BoundsChecker;
pub use byte_store::{AccessWidth, ByteStore, Location};
pub use growth::GrowthController;
pub use memory::Memory;
pub use memory_config::{Limits, MemoryConfig};
pub use stats::{MemoryStats, MemoryStatsSnapshot};

/// The WebAssembly memory page size (64KiB)
pub const PAGE_SIZE: usize = 65536;

/// Maximum number of pages addressable with 32-bit offsets (4GiB)
pub const MAX_PAGES: u32 = 65536;

/// Result of `memory.grow` when growth is refused
pub const GROW_FAILED: i32 = -1;
