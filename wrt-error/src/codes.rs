// WRT - wrt-error
// Module: WRT Error Codes
// SW-REQ-ID: REQ_004
// SW-REQ-ID: REQ_ERROR_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error codes for the shared linear memory

// Trap codes (1000-1099)
/// Atomic or plain access outside `[0, byte_length)`
pub const MEMORY_OUT_OF_BOUNDS: u16 = 1000;
/// Atomic access whose address is not a multiple of its width
pub const UNALIGNED_ATOMIC_ACCESS: u16 = 1001;

// Configuration codes (2000-2099)
/// Creation parameters rejected (initial > maximum, negative, overflow)
pub const INVALID_MEMORY_CONFIG: u16 = 2000;
/// Shared memory declared without a maximum
pub const SHARED_MEMORY_WITHOUT_MAXIMUM: u16 = 2001;
/// Access width other than 1, 2 or 4 bytes
pub const INVALID_ACCESS_WIDTH: u16 = 2002;
/// Attempt to share a memory created as unshared
pub const MEMORY_NOT_SHAREABLE: u16 = 2003;

// Resource codes (3000-3099)
/// Growth rejected; memory left unchanged
pub const MEMORY_GROW_FAILED: u16 = 3000;
/// Backing page could not be installed
pub const PAGE_INSTALL_FAILED: u16 = 3001;

// System codes (0x1000-0x10FF)
/// Formatting failure
pub const SYSTEM_ERROR: u16 = 0x1000;
