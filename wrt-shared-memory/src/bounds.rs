//! Bounds validation against a size snapshot.

use crate::{
    byte_store::AccessWidth,
    prelude::{Error, Result},
};

/// Validates accesses against one snapshot of a store's byte length.
///
/// The end of an access is computed in 64 bits, so `address + width` can
/// never wrap past the end of the 32-bit address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsChecker {
    size: u64,
}

impl BoundsChecker {
    /// Checker for a store whose byte length was observed as `size`
    #[inline]
    pub const fn new(size: u64) -> Self {
        Self { size }
    }

    /// Byte length this checker validates against
    #[inline]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Accept `[address, address + width)` iff it lies inside `[0, size)`.
    #[inline]
    pub fn validate(&self, address: u32, width: AccessWidth) -> Result<()> {
        self.validate_range(address, width.bytes())
    }

    /// Accept `[address, address + len)` iff it lies inside `[0, size)`.
    ///
    /// An empty range is accepted at any address up to and including `size`.
    pub fn validate_range(&self, address: u32, len: usize) -> Result<()> {
        let end = u64::from(address)
            .checked_add(len as u64)
            .ok_or(Error::OUT_OF_BOUNDS_TRAP)?;
        if end > self.size {
            return Err(Error::OUT_OF_BOUNDS_TRAP);
        }
        Ok(())
    }

    /// Natural alignment check for atomic accesses.
    ///
    /// Run only after [`validate`](Self::validate) succeeds so out-of-range
    /// addresses always report the bounds trap.
    #[inline]
    pub fn check_alignment(address: u32, width: AccessWidth) -> Result<()> {
        if width.is_aligned(address) {
            Ok(())
        } else {
            Err(Error::UNALIGNED_ATOMIC_TRAP)
        }
    }
}
