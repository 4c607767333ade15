//! Full-memory sweeps of every atomic RMW operator at every width.
//!
//! Each sweep seeds a slot through a plain store, issues one RMW, checks the
//! returned prior value, and checks the stored result. Every memory is then
//! probed just past its end and past its maximum.

use wrt_shared_memory::{AccessWidth, Memory, MemoryConfig, Result, PAGE_SIZE};

type RmwFn = fn(&Memory, u32, u32) -> Result<u32>;

fn shared_memory(initial: u32, maximum: u32) -> Memory {
    let memory = Memory::new(MemoryConfig::shared(initial, maximum).unwrap()).unwrap();
    // Operate through a second handle, as an instance importing the memory
    memory.share().unwrap()
}

fn poke(memory: &Memory, width: AccessWidth, address: u32, value: u32) {
    match width {
        AccessWidth::One => memory.store_u8(address, value as u8),
        AccessWidth::Two => memory.store_u16(address, value as u16),
        AccessWidth::Four => memory.store_u32(address, value),
    }
    .unwrap();
}

fn peek(memory: &Memory, width: AccessWidth, address: u32) -> u32 {
    match width {
        AccessWidth::One => memory.load_u8(address).map(u32::from),
        AccessWidth::Two => memory.load_u16(address).map(u32::from),
        AccessWidth::Four => memory.load_u32(address),
    }
    .unwrap()
}

/// Seed every `width` slot with `seed(index, slots)`, apply `rmw` with
/// `operand(index)`, and compare against `expected(old, operand)`.
fn sweep(
    memory: &Memory,
    width: AccessWidth,
    rmw: RmwFn,
    seed: impl Fn(u32, u32) -> u32,
    operand: impl Fn(u32) -> u32,
    expected: impl Fn(u32, u32) -> u32,
) {
    let bytes = width.bytes() as u32;
    let slots = (memory.byte_length() / u64::from(bytes)) as u32;
    for index in 0..slots {
        let address = index * bytes;
        let old = width.truncate(seed(index, slots));
        let value = operand(index);
        poke(memory, width, address, old);
        assert_eq!(rmw(memory, address, value).unwrap(), old, "prior value at {address}");
        assert_eq!(
            peek(memory, width, address),
            width.truncate(expected(old, value)),
            "stored value at {address}"
        );
    }
}

fn widths(rmw32: RmwFn, rmw16: RmwFn, rmw8: RmwFn) -> [(RmwFn, AccessWidth); 3] {
    [(rmw32, AccessWidth::Four), (rmw16, AccessWidth::Two), (rmw8, AccessWidth::One)]
}

fn verify_bounds_check(memory: &Memory, funcs: &[(RmwFn, AccessWidth)], max_pages: u32) {
    let size = memory.byte_length() as u32;
    for &(func, width) in funcs {
        let w = width.bytes() as u32;
        for address in (size - w + 1)..(size + w + 4) {
            let err = func(memory, address, 5).unwrap_err();
            assert!(err.is_out_of_bounds(), "address {address} width {w}");
        }
        let beyond_max = (max_pages + 1) * PAGE_SIZE as u32;
        assert!(func(memory, beyond_max, 5).unwrap_err().is_out_of_bounds());
    }
}

#[test]
fn test_atomic_add() {
    let memory = shared_memory(1, 10);

    sweep(&memory, AccessWidth::Four, Memory::atomic_add32, |i, _| i, |_| 0xACED_ACED, u32::wrapping_add);
    assert_eq!(memory.load_u32(4).unwrap(), 1 + 0xACED_ACED);

    sweep(&memory, AccessWidth::Two, Memory::atomic_add16, |i, _| i, |_| 0x1234, u32::wrapping_add);
    sweep(&memory, AccessWidth::One, Memory::atomic_add8, |_, _| 0x11, |_| 0xEE, u32::wrapping_add);
    assert_eq!(memory.load_u8(0).unwrap(), 0xFF);

    verify_bounds_check(
        &memory,
        &widths(Memory::atomic_add32, Memory::atomic_add16, Memory::atomic_add8),
        10,
    );
}

#[test]
fn test_atomic_sub() {
    let memory = shared_memory(5, 20);

    sweep(&memory, AccessWidth::Four, Memory::atomic_sub32, |_, len| len, |i| i, u32::wrapping_sub);
    sweep(&memory, AccessWidth::Two, Memory::atomic_sub16, |_, _| 0xFFFF, |_| 0x1234, u32::wrapping_sub);
    sweep(&memory, AccessWidth::One, Memory::atomic_sub8, |_, _| 0xFF, |i| i % 0xFF, u32::wrapping_sub);
    assert_eq!(memory.load_u8(3).unwrap(), 0xFF - 3);

    verify_bounds_check(
        &memory,
        &widths(Memory::atomic_sub32, Memory::atomic_sub16, Memory::atomic_sub8),
        20,
    );
}

#[test]
fn test_atomic_and() {
    let memory = shared_memory(5, 20);

    sweep(&memory, AccessWidth::Four, Memory::atomic_and32, |_, len| len, |i| i, |a, b| a & b);
    sweep(&memory, AccessWidth::Two, Memory::atomic_and16, |_, _| 0xFFFF, |_| 0x1234, |a, b| a & b);
    sweep(&memory, AccessWidth::One, Memory::atomic_and8, |_, _| 0xFF, |i| i % 0xFF, |a, b| a & b);

    verify_bounds_check(
        &memory,
        &widths(Memory::atomic_and32, Memory::atomic_and16, Memory::atomic_and8),
        20,
    );
}

#[test]
fn test_atomic_or() {
    let memory = shared_memory(5, 20);

    sweep(&memory, AccessWidth::Four, Memory::atomic_or32, |_, len| len, |i| i, |a, b| a | b);
    sweep(&memory, AccessWidth::Two, Memory::atomic_or16, |_, _| 0xFFFF, |_| 0x1234, |a, b| a | b);
    sweep(&memory, AccessWidth::One, Memory::atomic_or8, |_, _| 0xFF, |i| i % 0xFF, |a, b| a | b);

    verify_bounds_check(
        &memory,
        &widths(Memory::atomic_or32, Memory::atomic_or16, Memory::atomic_or8),
        20,
    );
}

#[test]
fn test_atomic_xor() {
    let memory = shared_memory(5, 20);

    sweep(&memory, AccessWidth::Four, Memory::atomic_xor32, |_, len| len, |i| i, |a, b| a ^ b);
    sweep(&memory, AccessWidth::Two, Memory::atomic_xor16, |_, _| 0xFFFF, |_| 0x5678, |a, b| a ^ b);
    sweep(&memory, AccessWidth::One, Memory::atomic_xor8, |_, _| 0xFF, |i| i % 0xFF, |a, b| a ^ b);
    assert_eq!(memory.load_u8(1).unwrap(), 0xFF ^ 1);

    verify_bounds_check(
        &memory,
        &widths(Memory::atomic_xor32, Memory::atomic_xor16, Memory::atomic_xor8),
        20,
    );
}

#[test]
fn test_narrow_operands_are_truncated() {
    let memory = shared_memory(1, 1);
    memory.store_u32(0, 0).unwrap();
    assert_eq!(memory.atomic_add8(0, 0x1FF).unwrap(), 0);
    assert_eq!(memory.atomic_add16(2, 0xABCD_0001).unwrap(), 0);
    assert_eq!(memory.load_u32(0).unwrap(), 0x0001_00FF);
}

#[test]
fn test_neighbouring_slots_are_independent() {
    let memory = shared_memory(1, 1);
    memory.store_u32(16, 0x8000_80FF).unwrap();

    // Carry out of the low byte must not reach byte 1
    assert_eq!(memory.atomic_add8(16, 1).unwrap(), 0xFF);
    // Borrow out of the low half must not reach the high half
    assert_eq!(memory.atomic_sub16(16, 0x8001).unwrap(), 0x8000);
    assert_eq!(memory.atomic_xor8(19, 0x80).unwrap(), 0x80);

    assert_eq!(memory.load_u32(16).unwrap(), 0x0000_FFFF);
}

#[test]
fn test_unaligned_atomic_traps_without_mutation() {
    let memory = shared_memory(1, 1);
    memory.store_u32(0, 0x0102_0304).unwrap();
    for (func, address) in [
        (Memory::atomic_add16 as RmwFn, 1),
        (Memory::atomic_or32 as RmwFn, 2),
        (Memory::atomic_xor32 as RmwFn, 3),
    ] {
        let err = func(&memory, address, 0xFF).unwrap_err();
        assert!(err.is_trap());
        assert!(!err.is_out_of_bounds());
    }
    assert_eq!(memory.load_u32(0).unwrap(), 0x0102_0304);
    assert_eq!(memory.stats().unaligned_traps, 3);
}

#[test]
fn test_out_of_bounds_after_growth_moves_with_size() {
    let memory = shared_memory(1, 2);
    let end = PAGE_SIZE as u32;
    assert!(memory.atomic_add32(end, 1).unwrap_err().is_out_of_bounds());
    assert_eq!(memory.grow_memory(1), 1);
    assert_eq!(memory.atomic_add32(end, 1).unwrap(), 0);
    assert!(memory.atomic_add32(2 * end, 1).unwrap_err().is_out_of_bounds());
}

#[test]
fn test_bounds_check_after_growth_to_maximum() {
    let memory = shared_memory(1, 2);
    assert_eq!(memory.grow_memory(1), 1);
    assert_eq!(memory.size_in_pages(), memory.max_pages());

    for funcs in [
        widths(Memory::atomic_add32, Memory::atomic_add16, Memory::atomic_add8),
        widths(Memory::atomic_sub32, Memory::atomic_sub16, Memory::atomic_sub8),
        widths(Memory::atomic_and32, Memory::atomic_and16, Memory::atomic_and8),
        widths(Memory::atomic_or32, Memory::atomic_or16, Memory::atomic_or8),
        widths(Memory::atomic_xor32, Memory::atomic_xor16, Memory::atomic_xor8),
    ] {
        verify_bounds_check(&memory, &funcs, 2);
    }
}
