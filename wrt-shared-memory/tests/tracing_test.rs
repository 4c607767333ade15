//! Smoke tests for the `tracing` feature
#![cfg(feature = "tracing")]

use wrt_shared_memory::{
    tracing::{Level, MemoryTrace},
    Memory, MemoryConfig, GROW_FAILED, PAGE_SIZE,
};

fn init_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn test_traced_lifecycle() {
    init_subscriber();

    let memory = Memory::new(MemoryConfig::shared(1, 2).unwrap()).unwrap();
    assert_eq!(memory.grow_memory(1), 1);
    assert_eq!(memory.grow_memory(1), GROW_FAILED);
    assert!(memory.atomic_add32(2 * PAGE_SIZE as u32, 1).is_err());
    assert!(memory.atomic_add32(2, 1).is_err());
}

#[test]
fn test_access_span_is_enterable() {
    init_subscriber();

    let span = MemoryTrace::accessing(64, 4);
    let _guard = span.enter();
    let memory = Memory::new(MemoryConfig::unshared(1, None).unwrap()).unwrap();
    assert_eq!(memory.atomic_or8(64, 1).unwrap(), 0);
}
