//! Page-granular backing storage for a linear memory.
//!
//! The store keeps one directory slot per page it may ever hold, sized from
//! the configured maximum at creation. Each slot is filled at most once with a
//! boxed array of `AtomicU32` words, so a page never moves once installed and
//! every byte is reachable through an atomic. Bytes are packed little-endian:
//! byte `i` of a word occupies bits `8*i .. 8*i + 8`.
//!
//! The current size is a page count published with `Release` after the pages
//! it covers are installed. A reader that observes a size with `Acquire` also
//! observes the zeroed contents of every page below it.

use crate::{
    atomic_execution::RmwOp,
    memory_config::MemoryConfig,
    prelude::{AtomicU32, Box, Error, Ordering, Result, Vec, WrtMutex, WrtOnce},
    stats::MemoryStats,
    PAGE_SIZE,
};

const WORD_BYTES: usize = 4;
const WORDS_PER_PAGE: usize = PAGE_SIZE / WORD_BYTES;

/// Width of a single memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AccessWidth {
    /// 8-bit access
    One  = 1,
    /// 16-bit access
    Two  = 2,
    /// 32-bit access
    Four = 4,
}

impl AccessWidth {
    /// All widths, narrowest first
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Four];

    /// Number of bytes covered
    #[inline]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Number of bits covered
    #[inline]
    pub const fn bits(self) -> u32 {
        (self as u32) * 8
    }

    /// Mask selecting the low `bits()` bits of a value
    #[inline]
    pub const fn mask(self) -> u32 {
        match self {
            Self::One => 0xFF,
            Self::Two => 0xFFFF,
            Self::Four => u32::MAX,
        }
    }

    /// Truncate `value` to this width
    #[inline]
    pub const fn truncate(self, value: u32) -> u32 {
        value & self.mask()
    }

    /// Whether `address` is a multiple of this width
    #[inline]
    pub const fn is_aligned(self, address: u32) -> bool {
        address % (self as u32) == 0
    }
}

impl TryFrom<u32> for AccessWidth {
    type Error = Error;

    fn try_from(bytes: u32) -> Result<Self> {
        match bytes {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            _ => Err(Error::invalid_access_width(
                "Access width must be 1, 2 or 4 bytes",
            )),
        }
    }
}

type Page = Box<[AtomicU32]>;

/// Allocate one zeroed page, reporting allocator refusal as growth failure.
pub(crate) fn allocate_page() -> Result<Page> {
    let mut words = Vec::new();
    words
        .try_reserve_exact(WORDS_PER_PAGE)
        .map_err(|_| Error::memory_grow_failed("Page allocation failed"))?;
    words.resize_with(WORDS_PER_PAGE, || AtomicU32::new(0));
    Ok(words.into_boxed_slice())
}

/// Handle to a naturally aligned `width`-byte window inside one word.
///
/// Obtained from [`ByteStore::raw_access`] after a successful bounds check.
/// All operations on the handle are atomic with respect to every other
/// handle to the same word.
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    word:  &'a AtomicU32,
    shift: u32,
    width: AccessWidth,
}

impl Location<'_> {
    /// Width of the window
    #[inline]
    pub fn width(&self) -> AccessWidth {
        self.width
    }

    /// Read the window, zero-extended
    #[inline]
    pub fn load(&self, order: Ordering) -> u32 {
        (self.word.load(order) >> self.shift) & self.width.mask()
    }

    /// Overwrite the window, leaving the rest of the word untouched
    pub fn store(&self, value: u32, order: Ordering) {
        let value = self.width.truncate(value);
        if self.width == AccessWidth::Four {
            self.word.store(value, order);
            return;
        }
        let field = self.width.mask() << self.shift;
        let mut current = self.word.load(load_order(order));
        loop {
            let new = (current & !field) | (value << self.shift);
            match self.word.compare_exchange_weak(current, new, order, load_order(order)) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Apply `op` to the window indivisibly and return the prior value.
    ///
    /// The new value is `op(old, operand)` truncated to the window width.
    /// Bits of the word outside the window are never changed.
    pub fn rmw(&self, op: RmwOp, operand: u32) -> u32 {
        let operand = self.width.truncate(operand);
        let order = Ordering::SeqCst;

        if self.width == AccessWidth::Four {
            return match op {
                RmwOp::Add => self.word.fetch_add(operand, order),
                RmwOp::Sub => self.word.fetch_sub(operand, order),
                RmwOp::And => self.word.fetch_and(operand, order),
                RmwOp::Or => self.word.fetch_or(operand, order),
                RmwOp::Xor => self.word.fetch_xor(operand, order),
            };
        }

        let field = self.width.mask() << self.shift;
        let shifted = operand << self.shift;
        let prior_word = match op {
            // Bitwise ops never carry out of the window
            RmwOp::And => self.word.fetch_and(shifted | !field, order),
            RmwOp::Or => self.word.fetch_or(shifted, order),
            RmwOp::Xor => self.word.fetch_xor(shifted, order),
            RmwOp::Add | RmwOp::Sub => {
                let splice = |word: u32| {
                    let old = (word & field) >> self.shift;
                    let new = self.width.truncate(op.apply(old, operand));
                    Some((word & !field) | (new << self.shift))
                };
                match self.word.fetch_update(order, order, splice) {
                    Ok(prior) | Err(prior) => prior,
                }
            },
        };
        (prior_word & field) >> self.shift
    }
}

fn load_order(order: Ordering) -> Ordering {
    match order {
        Ordering::Release | Ordering::Relaxed => Ordering::Relaxed,
        Ordering::AcqRel => Ordering::Acquire,
        other => other,
    }
}

/// Growable storage shared by every agent holding a memory.
pub struct ByteStore {
    pages:         Box<[WrtOnce<Page>]>,
    current_pages: AtomicU32,
    maximum_pages: u32,
    shared:        bool,
    grow_lock:     WrtMutex<()>,
    stats:         MemoryStats,
}

impl ByteStore {
    /// Create a store holding `config.initial_pages()` zeroed pages.
    pub fn create(config: &MemoryConfig) -> Result<Self> {
        let slots = config.maximum_pages() as usize;
        let mut directory = Vec::new();
        directory
            .try_reserve_exact(slots)
            .map_err(|_| Error::memory_grow_failed("Page directory allocation failed"))?;
        directory.resize_with(slots, WrtOnce::new);

        let store = Self {
            pages:         directory.into_boxed_slice(),
            current_pages: AtomicU32::new(0),
            maximum_pages: config.maximum_pages(),
            shared:        config.is_shared(),
            grow_lock:     WrtMutex::new(()),
            stats:         MemoryStats::new(),
        };

        for index in 0..config.initial_pages() {
            store.install(index, allocate_page()?)?;
        }
        store.publish(config.initial_pages());
        Ok(store)
    }

    /// Current size in bytes, read with `Acquire` ordering.
    ///
    /// Each operation takes this snapshot exactly once.
    #[inline]
    pub fn snapshot_size(&self) -> u64 {
        u64::from(self.size_in_pages()) * PAGE_SIZE as u64
    }

    /// Current size in pages
    #[inline]
    pub fn size_in_pages(&self) -> u32 {
        self.current_pages.load(Ordering::Acquire)
    }

    /// Maximum size in pages
    #[inline]
    pub fn max_pages(&self) -> u32 {
        self.maximum_pages
    }

    /// Maximum size in bytes
    #[inline]
    pub fn max_bytes(&self) -> u64 {
        u64::from(self.maximum_pages) * PAGE_SIZE as u64
    }

    /// Whether the store may be held by more than one agent
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Operation counters
    #[inline]
    pub fn stats(&self) -> &MemoryStats {
        &self.stats
    }

    /// Location handle for the `width`-byte window at `offset`.
    ///
    /// Callers must have validated `offset + width <= snapshot_size()` and
    /// natural alignment. A window on an uninstalled page is reported as out
    /// of bounds.
    pub fn raw_access(&self, offset: u32, width: AccessWidth) -> Result<Location<'_>> {
        if !width.is_aligned(offset) {
            return Err(Error::UNALIGNED_ATOMIC_TRAP);
        }
        let offset = offset as usize;
        let page = self
            .pages
            .get(offset / PAGE_SIZE)
            .and_then(WrtOnce::get)
            .ok_or(Error::OUT_OF_BOUNDS_TRAP)?;
        let in_page = offset % PAGE_SIZE;
        let word = page.get(in_page / WORD_BYTES).ok_or(Error::OUT_OF_BOUNDS_TRAP)?;
        Ok(Location { word, shift: ((in_page % WORD_BYTES) * 8) as u32, width })
    }

    pub(crate) fn install(&self, index: u32, page: Page) -> Result<()> {
        let slot = self
            .pages
            .get(index as usize)
            .ok_or(Error::memory_grow_failed("Page index beyond maximum"))?;
        slot.install(page).map(|_| ())
    }

    pub(crate) fn publish(&self, pages: u32) {
        self.current_pages.store(pages, Ordering::Release);
    }

    pub(crate) fn grow_lock(&self) -> &WrtMutex<()> {
        &self.grow_lock
    }
}

impl core::fmt::Debug for ByteStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteStore")
            .field("current_pages", &self.size_in_pages())
            .field("maximum_pages", &self.maximum_pages)
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}
