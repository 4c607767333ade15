//! Atomic read-modify-write execution.
//!
//! Every RMW kind and width runs through [`AtomicRmwEngine::execute`]: one
//! size snapshot, a bounds check, an alignment check, then a single indivisible
//! update of the addressed window. A trap leaves memory untouched.

use crate::{
    bounds::BoundsChecker,
    byte_store::{AccessWidth, ByteStore},
    prelude::Result,
};

/// Read-modify-write operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RmwOp {
    /// Wrapping addition
    Add,
    /// Wrapping subtraction
    Sub,
    /// Bitwise and
    And,
    /// Bitwise or
    Or,
    /// Bitwise exclusive or
    Xor,
}

impl RmwOp {
    /// All operators
    pub const ALL: [Self; 5] = [Self::Add, Self::Sub, Self::And, Self::Or, Self::Xor];

    /// Compute the new value from the old one, modulo 2^32.
    ///
    /// Callers truncate the result to the access width.
    #[inline]
    pub const fn apply(self, old: u32, operand: u32) -> u32 {
        match self {
            Self::Add => old.wrapping_add(operand),
            Self::Sub => old.wrapping_sub(operand),
            Self::And => old & operand,
            Self::Or => old | operand,
            Self::Xor => old ^ operand,
        }
    }

    /// Operator mnemonic as used in instruction names
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
        }
    }
}

/// A decoded atomic RMW: effective address, width, operand and operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomicOperationRequest {
    /// Effective byte address
    pub address: u32,
    /// Access width
    pub width:   AccessWidth,
    /// Operand; only the low `8 * width` bits are used
    pub operand: u32,
    /// Operator
    pub op:      RmwOp,
}

impl AtomicOperationRequest {
    /// Create a request
    pub const fn new(op: RmwOp, width: AccessWidth, address: u32, operand: u32) -> Self {
        Self { address, width, operand, op }
    }
}

/// Executes atomic RMW requests against a [`ByteStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicRmwEngine;

impl AtomicRmwEngine {
    /// Perform `request` and return the prior value zero-extended to 32 bits.
    ///
    /// Fails with an out-of-bounds trap when the window is not inside the
    /// store, and with an unaligned trap when an in-bounds address is not a
    /// multiple of the width. Neither failure mutates memory.
    pub fn execute(store: &ByteStore, request: AtomicOperationRequest) -> Result<u32> {
        let size = store.snapshot_size();
        let checker = BoundsChecker::new(size);

        if let Err(trap) = checker.validate(request.address, request.width) {
            store.stats().record_out_of_bounds();
            Self::trace_trap(&request, size, trap.message);
            return Err(trap);
        }
        if let Err(trap) = BoundsChecker::check_alignment(request.address, request.width) {
            store.stats().record_unaligned();
            Self::trace_trap(&request, size, trap.message);
            return Err(trap);
        }

        let prior = store.raw_access(request.address, request.width)?.rmw(request.op, request.operand);
        store.stats().record_rmw();
        Ok(prior)
    }

    #[allow(unused_variables)]
    fn trace_trap(request: &AtomicOperationRequest, size: u64, reason: &'static str) {
        #[cfg(feature = "tracing")]
        crate::tracing::trap(request.address, request.width.bytes(), size, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory_config::MemoryConfig, prelude::Ordering, PAGE_SIZE};

    fn store() -> ByteStore {
        ByteStore::create(&MemoryConfig::shared(1, 2).unwrap()).unwrap()
    }

    fn seed(store: &ByteStore, address: u32, width: AccessWidth, value: u32) {
        store.raw_access(address, width).unwrap().store(value, Ordering::SeqCst);
    }

    fn peek(store: &ByteStore, address: u32, width: AccessWidth) -> u32 {
        store.raw_access(address, width).unwrap().load(Ordering::SeqCst)
    }

    #[test]
    fn apply_is_modular() {
        assert_eq!(RmwOp::Add.apply(u32::MAX, 2), 1);
        assert_eq!(RmwOp::Sub.apply(0, 1), u32::MAX);
        assert_eq!(RmwOp::Xor.apply(0xF0, 0xFF), 0x0F);
    }

    #[test]
    fn returns_prior_value_for_every_op_and_width() {
        let store = store();
        for width in AccessWidth::ALL {
            for op in RmwOp::ALL {
                let address = 64;
                let old = width.truncate(0xA5C3_5A3C);
                let operand = 0x1357_9BDF;
                seed(&store, address, AccessWidth::Four, 0);
                seed(&store, address, width, old);

                let request = AtomicOperationRequest::new(op, width, address, operand);
                assert_eq!(AtomicRmwEngine::execute(&store, request).unwrap(), old);
                assert_eq!(
                    peek(&store, address, width),
                    width.truncate(op.apply(old, width.truncate(operand))),
                    "{} width {}",
                    op.name(),
                    width.bytes()
                );
            }
        }
    }

    #[test]
    fn trap_leaves_memory_untouched() {
        let store = store();
        let last = (PAGE_SIZE - 4) as u32;
        seed(&store, last, AccessWidth::Four, 7);

        let request = AtomicOperationRequest::new(RmwOp::Add, AccessWidth::Four, last + 2, 1);
        assert!(AtomicRmwEngine::execute(&store, request).unwrap_err().is_out_of_bounds());
        assert_eq!(peek(&store, last, AccessWidth::Four), 7);
        assert_eq!(store.stats().snapshot().out_of_bounds_traps, 1);
    }

    #[test]
    fn bounds_trap_wins_over_alignment() {
        let store = store();
        let request = AtomicOperationRequest::new(RmwOp::Or, AccessWidth::Four, PAGE_SIZE as u32 + 1, 1);
        assert!(AtomicRmwEngine::execute(&store, request).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn unaligned_access_traps() {
        let store = store();
        let request = AtomicOperationRequest::new(RmwOp::Add, AccessWidth::Two, 3, 1);
        let err = AtomicRmwEngine::execute(&store, request).unwrap_err();
        assert_eq!(err.code, wrt_error::codes::UNALIGNED_ATOMIC_ACCESS);
        assert_eq!(peek(&store, 0, AccessWidth::Four), 0);
        assert_eq!(store.stats().snapshot().unaligned_traps, 1);
    }
}
