//! Tracing support for shared memory
//!
//! Span helpers for the lifecycle events of a memory: creation, growth and
//! traps. Atomic operations themselves are not traced on the success path.

pub use tracing::{debug, debug_span, trace, trace_span, warn, Level, Span};

/// Spans for memory lifecycle events
#[derive(Debug, Clone)]
pub struct MemoryTrace;

impl MemoryTrace {
    /// Create a span for memory creation
    #[inline]
    pub fn creating(initial_pages: u32, maximum_pages: u32, shared: bool) -> Span {
        debug_span!(
            "memory_create",
            initial_pages = %initial_pages,
            maximum_pages = %maximum_pages,
            shared = %shared
        )
    }

    /// Create a span for a growth request
    #[inline]
    pub fn growing(current_pages: u32, delta_pages: i64) -> Span {
        debug_span!("memory_grow", current_pages = %current_pages, delta = %delta_pages)
    }

    /// Create a span for a bounds-checked access
    #[inline]
    pub fn accessing(address: u32, len: usize) -> Span {
        trace_span!("memory_access", address = %address, len = %len)
    }
}

/// Record a trap raised to the calling agent
#[inline]
pub fn trap(address: u32, width: usize, byte_length: u64, reason: &'static str) {
    warn!(
        address = %address,
        width = %width,
        byte_length = %byte_length,
        "{}",
        reason
    );
}
