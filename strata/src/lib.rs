mod backing;
mod block;
mod cache;
mod stats;
mod utils;

pub mod trace;


use log::debug;
use thiserror::Error;

pub use crate::backing::FlushEvent;
pub use crate::block::{Block, BlockFlags};
pub use crate::cache::Cache;
pub use crate::stats::CacheStats;

/// Geometry for a single cache level.
///
/// All four values must be non-zero, the block size must be a power of two,
/// and the capacity must divide into a power-of-two number of sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Total capacity in bytes.
    pub cache_size:         usize,
    /// Bytes per block.
    pub block_size:         usize,
    /// Associativity.
    pub ways:               usize,
    /// Capacity of the victim FIFO, in blocks.
    pub victim_cache_size:  usize,
}

impl CacheConfig {
    /// 32kB, 64-byte blocks, 8-way, 8 victim entries.
    pub const L1: CacheConfig = CacheConfig {
        cache_size:         32 * 1024,
        block_size:         64,
        ways:               8,
        victim_cache_size:  8,
    };

    /// 256kB, 64-byte blocks, 8-way, 16 victim entries.
    pub const L2: CacheConfig = CacheConfig {
        cache_size:         256 * 1024,
        block_size:         64,
        ways:               8,
        victim_cache_size:  16,
    };
}

/// Rejected cache geometry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be non-zero")]
    Zero { name: &'static str },
    #[error("{name} must be a power of two (got {value})")]
    NotPowerOfTwo { name: &'static str, value: usize },
    #[error("{cache_size} bytes does not divide into {ways}-way sets of {block_size}-byte blocks")]
    Geometry { cache_size: usize, block_size: usize, ways: usize },
}

/// The outcome of a single access at one point in the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessResult {
    Hit,
    Miss,
}

impl AccessResult {
    pub fn is_hit(self) -> bool {
        matches!(self, AccessResult::Hit)
    }
}

impl std::fmt::Display for AccessResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessResult::Hit => write!(f, "hit"),
            AccessResult::Miss => write!(f, "miss"),
        }
    }
}

/// An ordered hierarchy of cache levels, level 0 nearest the requester.
///
/// An access walks down the levels until one hits; every level above the
/// hit is then given a clean copy of the block. Levels are otherwise
/// independent: no inclusion or exclusion policy is enforced between them,
/// so a block may be resident in both levels, or in neither.
#[derive(Debug)]
pub struct MultiLevelCache {
    levels: Vec<Cache>,
}

impl MultiLevelCache {
    pub fn new(configs: &[CacheConfig]) -> Result<Self, ConfigError> {
        let levels = configs.iter()
            .map(Cache::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            levels
        })
    }

    /// The reference two-level hierarchy.
    pub fn two_level() -> Self {
        Self::new(&[CacheConfig::L1, CacheConfig::L2]).expect("reference geometry is valid")
    }

    /// Try an access against each level in order.
    ///
    /// The first level to hit ends the walk, and the levels above it are
    /// filled with the block. A miss at every level is reported as a miss;
    /// each missed level has still installed the block on its own miss
    /// path, so a repeat access will hit at level 0.
    pub fn access_memory(&mut self, addr: u32, is_write: bool) -> AccessResult {
        for level in 0..self.levels.len() {
            if self.levels[level].access(addr, is_write).is_hit() {
                debug!("L{} hit: {:#010X}", level + 1, addr);
                for upper in self.levels[..level].iter_mut() {
                    upper.fill(addr);
                }
                return AccessResult::Hit;
            }
        }
        debug!("miss at all levels: {:#010X}", addr);
        AccessResult::Miss
    }

    /// Write back everything dirty and empty every level.
    pub fn flush_all(&mut self) {
        for level in &mut self.levels {
            level.flush();
        }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> &Cache {
        &self.levels[level]
    }

    pub fn level_mut(&mut self, level: usize) -> &mut Cache {
        &mut self.levels[level]
    }
}
