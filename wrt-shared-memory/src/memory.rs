//! The memory handle held by execution agents.
//!
//! A [`Memory`] is a reference-counted handle to one [`ByteStore`]. Each agent
//! that imports a shared memory holds its own handle, obtained with
//! [`Memory::share`]; the store is dropped with the last handle.

use crate::{
    atomic_execution::{AtomicOperationRequest, AtomicRmwEngine, RmwOp},
    bounds::BoundsChecker,
    byte_store::{AccessWidth, ByteStore},
    growth::GrowthController,
    memory_config::MemoryConfig,
    prelude::{fmt, Arc, Error, Ordering, Result},
    stats::MemoryStatsSnapshot,
    GROW_FAILED,
    PAGE_SIZE,
};

macro_rules! atomic_rmw_methods {
    ($($name:ident => $op:ident, $width:ident;)*) => {
        $(
            #[doc = concat!(
                "`", stringify!($name), "`: atomically apply `", stringify!($op),
                "` to the ", stringify!($width), "-byte value at `address`, returning its prior value."
            )]
            #[inline]
            pub fn $name(&self, address: u32, operand: u32) -> Result<u32> {
                self.atomic_rmw(RmwOp::$op, AccessWidth::$width, address, operand)
            }
        )*
    };
}

/// Handle to a linear memory
pub struct Memory {
    store: Arc<ByteStore>,
}

impl Memory {
    /// Create a memory from a validated configuration
    pub fn new(config: MemoryConfig) -> Result<Self> {
        #[cfg(feature = "tracing")]
        let _span = crate::tracing::MemoryTrace::creating(
            config.initial_pages(),
            config.maximum_pages(),
            config.is_shared(),
        )
        .entered();

        let store = ByteStore::create(&config)?;
        Ok(Self { store: Arc::new(store) })
    }

    /// Create a memory from a host descriptor with signed page counts
    pub fn from_descriptor(initial: i64, maximum: Option<i64>, shared: bool) -> Result<Self> {
        Self::new(MemoryConfig::from_descriptor(initial, maximum, shared)?)
    }

    /// Another handle to the same storage, for a second agent.
    ///
    /// Only shared memories may be held by more than one agent.
    pub fn share(&self) -> Result<Self> {
        if !self.store.is_shared() {
            return Err(Error::memory_not_shareable(
                "Only shared memories can be imported by another agent",
            ));
        }
        Ok(Self { store: Arc::clone(&self.store) })
    }

    /// Whether `other` refers to the same storage
    pub fn same_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    /// Underlying store
    pub fn byte_store(&self) -> &ByteStore {
        &self.store
    }

    /// Whether this memory is shared
    pub fn is_shared(&self) -> bool {
        self.store.is_shared()
    }

    /// Current size in pages
    pub fn size_in_pages(&self) -> u32 {
        self.store.size_in_pages()
    }

    /// Current size in bytes
    pub fn byte_length(&self) -> u64 {
        self.store.snapshot_size()
    }

    /// Maximum size in pages
    pub fn max_pages(&self) -> u32 {
        self.store.max_pages()
    }

    /// Counter values for this memory, across all handles
    pub fn stats(&self) -> MemoryStatsSnapshot {
        self.store.stats().snapshot()
    }

    /// Execute one atomic RMW request
    #[inline]
    pub fn execute(&self, request: AtomicOperationRequest) -> Result<u32> {
        AtomicRmwEngine::execute(&self.store, request)
    }

    /// Atomically apply `op` at `address` with the given width
    #[inline]
    pub fn atomic_rmw(&self, op: RmwOp, width: AccessWidth, address: u32, operand: u32) -> Result<u32> {
        self.execute(AtomicOperationRequest::new(op, width, address, operand))
    }

    atomic_rmw_methods! {
        atomic_add8 => Add, One;
        atomic_add16 => Add, Two;
        atomic_add32 => Add, Four;
        atomic_sub8 => Sub, One;
        atomic_sub16 => Sub, Two;
        atomic_sub32 => Sub, Four;
        atomic_and8 => And, One;
        atomic_and16 => And, Two;
        atomic_and32 => And, Four;
        atomic_or8 => Or, One;
        atomic_or16 => Or, Two;
        atomic_or32 => Or, Four;
        atomic_xor8 => Xor, One;
        atomic_xor16 => Xor, Two;
        atomic_xor32 => Xor, Four;
    }

    /// Grow by `delta_pages` and return the previous size in pages
    pub fn grow(&self, delta_pages: u32) -> Result<u32> {
        let new_pages = GrowthController::grow(&self.store, i64::from(delta_pages))?;
        Ok(new_pages - delta_pages)
    }

    /// `memory.grow`: previous size in pages, or [`GROW_FAILED`]
    pub fn grow_memory(&self, delta_pages: u32) -> i32 {
        match self.grow(delta_pages) {
            // At most MAX_PAGES, which fits in i32
            Ok(previous) => previous as i32,
            Err(_) => GROW_FAILED,
        }
    }

    /// Plain 8-bit load
    pub fn load_u8(&self, address: u32) -> Result<u8> {
        self.plain_load(address, AccessWidth::One).map(|v| v as u8)
    }

    /// Plain little-endian 16-bit load
    pub fn load_u16(&self, address: u32) -> Result<u16> {
        self.plain_load(address, AccessWidth::Two).map(|v| v as u16)
    }

    /// Plain little-endian 32-bit load
    pub fn load_u32(&self, address: u32) -> Result<u32> {
        self.plain_load(address, AccessWidth::Four)
    }

    /// Plain 8-bit store
    pub fn store_u8(&self, address: u32, value: u8) -> Result<()> {
        self.plain_store(address, AccessWidth::One, u32::from(value))
    }

    /// Plain little-endian 16-bit store
    pub fn store_u16(&self, address: u32, value: u16) -> Result<()> {
        self.plain_store(address, AccessWidth::Two, u32::from(value))
    }

    /// Plain little-endian 32-bit store
    pub fn store_u32(&self, address: u32, value: u32) -> Result<()> {
        self.plain_store(address, AccessWidth::Four, value)
    }

    /// Copy `buffer.len()` bytes starting at `address` into `buffer`
    pub fn read(&self, address: u32, buffer: &mut [u8]) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _span = crate::tracing::MemoryTrace::accessing(address, buffer.len()).entered();

        self.check_plain(address, buffer.len())?;
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = self.byte(address + i as u32)?.load(Ordering::Relaxed) as u8;
        }
        Ok(())
    }

    /// Copy `data` into memory starting at `address`
    pub fn write(&self, address: u32, data: &[u8]) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _span = crate::tracing::MemoryTrace::accessing(address, data.len()).entered();

        self.check_plain(address, data.len())?;
        for (i, &byte) in data.iter().enumerate() {
            self.byte(address + i as u32)?.store(u32::from(byte), Ordering::Relaxed);
        }
        Ok(())
    }

    /// Aligned accesses hit one word; others are assembled byte by byte.
    fn plain_load(&self, address: u32, width: AccessWidth) -> Result<u32> {
        self.check_plain(address, width.bytes())?;
        if width.is_aligned(address) {
            return Ok(self.store.raw_access(address, width)?.load(Ordering::Relaxed));
        }
        let mut value = 0;
        for i in 0..width.bytes() {
            value |= self.byte(address + i as u32)?.load(Ordering::Relaxed) << (8 * i);
        }
        Ok(value)
    }

    fn plain_store(&self, address: u32, width: AccessWidth, value: u32) -> Result<()> {
        self.check_plain(address, width.bytes())?;
        if width.is_aligned(address) {
            self.store.raw_access(address, width)?.store(value, Ordering::Relaxed);
            return Ok(());
        }
        for i in 0..width.bytes() {
            self.byte(address + i as u32)?.store(value >> (8 * i), Ordering::Relaxed);
        }
        Ok(())
    }

    fn byte(&self, address: u32) -> Result<crate::byte_store::Location<'_>> {
        self.store.raw_access(address, AccessWidth::One)
    }

    fn check_plain(&self, address: u32, len: usize) -> Result<()> {
        let checked = BoundsChecker::new(self.store.snapshot_size()).validate_range(address, len);
        match checked {
            Ok(()) => self.store.stats().record_plain_access(),
            Err(_) => self.store.stats().record_out_of_bounds(),
        }
        checked
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("pages", &self.size_in_pages())
            .field("max_pages", &self.max_pages())
            .field("shared", &self.is_shared())
            .field("page_size", &PAGE_SIZE)
            .finish()
    }
}
