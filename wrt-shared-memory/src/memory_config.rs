//! Memory creation parameters.
//!
//! A [`MemoryConfig`] is the validated form of the `{initial, maximum,
//! shared}` descriptor a host supplies when it instantiates a memory. Once
//! constructed it always satisfies `initial <= maximum <= MAX_PAGES`, so
//! `ByteStore` creation cannot fail on its account.

use crate::{
    prelude::{Error, Result},
    MAX_PAGES,
    PAGE_SIZE,
};

/// Page limits of a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Limits {
    /// Initial size in pages
    pub min: u32,
    /// Maximum size in pages, if declared
    pub max: Option<u32>,
}

impl Limits {
    /// Create limits from raw page counts
    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }
}

/// Validated memory configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryConfig {
    initial_pages: u32,
    maximum_pages: u32,
    shared:        bool,
}

impl MemoryConfig {
    /// Validate limits and a shared flag.
    ///
    /// Shared memories must declare a maximum. Unshared memories without one
    /// may grow up to [`MAX_PAGES`].
    pub fn new(limits: Limits, shared: bool) -> Result<Self> {
        let maximum_pages = match limits.max {
            Some(max) => max,
            None if shared => {
                return Err(Error::shared_memory_without_maximum(
                    "Shared memory requires a maximum size",
                ))
            },
            None => MAX_PAGES,
        };

        if maximum_pages > MAX_PAGES {
            return Err(Error::invalid_memory_config(
                "Maximum size exceeds the 32-bit address space",
            ));
        }
        if limits.min > maximum_pages {
            return Err(Error::invalid_memory_config(
                "Initial size exceeds maximum size",
            ));
        }

        Ok(Self {
            initial_pages: limits.min,
            maximum_pages,
            shared,
        })
    }

    /// Configuration for a shared memory.
    pub fn shared(initial_pages: u32, maximum_pages: u32) -> Result<Self> {
        Self::new(Limits::new(initial_pages, Some(maximum_pages)), true)
    }

    /// Configuration for an unshared memory.
    pub fn unshared(initial_pages: u32, maximum_pages: Option<u32>) -> Result<Self> {
        Self::new(Limits::new(initial_pages, maximum_pages), false)
    }

    /// Validate a host-supplied descriptor whose page counts are signed.
    ///
    /// Negative counts and counts that do not fit the 32-bit page domain are
    /// configuration errors.
    pub fn from_descriptor(initial: i64, maximum: Option<i64>, shared: bool) -> Result<Self> {
        let initial = page_count(initial)?;
        let maximum = maximum.map(page_count).transpose()?;
        Self::new(Limits::new(initial, maximum), shared)
    }

    /// Initial size in pages
    pub const fn initial_pages(&self) -> u32 {
        self.initial_pages
    }

    /// Maximum size in pages
    pub const fn maximum_pages(&self) -> u32 {
        self.maximum_pages
    }

    /// Whether agents other than the creator may hold this memory
    pub const fn is_shared(&self) -> bool {
        self.shared
    }

    /// Initial size in bytes
    pub const fn initial_bytes(&self) -> u64 {
        self.initial_pages as u64 * PAGE_SIZE as u64
    }

    /// Maximum size in bytes
    pub const fn max_bytes(&self) -> u64 {
        self.maximum_pages as u64 * PAGE_SIZE as u64
    }

    /// Limits this configuration was built from
    pub const fn limits(&self) -> Limits {
        Limits::new(self.initial_pages, Some(self.maximum_pages))
    }
}

fn page_count(value: i64) -> Result<u32> {
    if value < 0 {
        return Err(Error::invalid_memory_config("Page count must not be negative"));
    }
    u32::try_from(value)
        .map_err(|_| Error::invalid_memory_config("Page count exceeds the address space"))
}
