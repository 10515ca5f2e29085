mod replace;
mod victim;


use crossbeam_channel::Receiver;
use log::{debug, trace};

use crate::backing::{FlushEvent, FlushPort};
use crate::block::Block;
use crate::stats::CacheStats;
use crate::{AccessResult, CacheConfig, ConfigError};
use replace::ReplacementState;
use victim::VictimCache;

/// How many levels of speculation a single external access may trigger.
///
/// A prefetch runs the full access path, so without a ceiling a dense
/// sequential stream would cascade one prefetch into the next without
/// bound. Demand accesses start with this budget; each nested prefetch
/// spends one.
const PREFETCH_DEPTH: u32 = 1;

/// A single set-associative cache level.
///
/// Owns `ways * num_sets` block slots, the replacement state for every
/// set, and a victim FIFO for recently evicted blocks. Write-back: a write
/// only marks the block dirty, and the payload reaches backing storage
/// when the block is evicted.
#[derive(Debug)]
pub struct Cache {
    // Geometry, fixed at construction.
    block_size:     usize,
    num_sets:       usize,
    ways:           usize,
    offset_bits:    u32,
    set_mask:       usize,
    tag_mask:       u32,

    sets:           Vec<Block>,     // indexed set * ways + way
    replacement:    ReplacementState,
    victims:        VictimCache,

    flush_port:     FlushPort,
    stats:          CacheStats,
}

impl Cache {
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let CacheConfig { cache_size, block_size, ways, victim_cache_size } = *config;

        for (name, value) in [
            ("cache size", cache_size),
            ("block size", block_size),
            ("ways", ways),
            ("victim cache size", victim_cache_size),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { name });
            }
        }
        if !block_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo { name: "block size", value: block_size });
        }
        if cache_size % (block_size * ways) != 0 {
            return Err(ConfigError::Geometry { cache_size, block_size, ways });
        }
        let num_sets = cache_size / (block_size * ways);
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo { name: "set count", value: num_sets });
        }

        debug!("cache: {} bytes, {}-byte blocks, {}-way, {} sets", cache_size, block_size, ways, num_sets);

        Ok(Self {
            block_size,
            num_sets,
            ways,
            offset_bits: block_size.trailing_zeros(),
            set_mask: num_sets - 1,
            tag_mask: !((num_sets * block_size - 1) as u32),
            sets: vec![Block::default(); num_sets * ways],
            replacement: ReplacementState::new(num_sets, ways),
            victims: VictimCache::new(victim_cache_size),
            flush_port: FlushPort::closed(),
            stats: CacheStats::default(),
        })
    }

    /// Read or write one address.
    ///
    /// A hit in the victim FIFO moves the block back into the set array
    /// and reports a hit. A miss installs the block, evicting through the
    /// same path. Hits and misses both speculatively pull in the next
    /// sequential block.
    pub fn access(&mut self, addr: u32, is_write: bool) -> AccessResult {
        self.access_inner(addr, is_write, PREFETCH_DEPTH)
    }

    fn access_inner(&mut self, addr: u32, is_write: bool, prefetch_budget: u32) -> AccessResult {
        let (set, tag) = self.decode(addr);

        if let Some(way) = self.lookup(set, tag) {
            trace!("hit: {:#010X} set {} way {}", addr, set, way);
            if is_write {
                self.sets[set * self.ways + way].mark_dirty();
            }
            self.replacement.touch(set, way);
            self.stats.hits += 1;
            self.prefetch_next(addr, prefetch_budget);
            return AccessResult::Hit;
        }

        if let Some(mut block) = self.victims.take(tag) {
            trace!("victim hit: {:#010X} tag {:#010X}", addr, tag);
            if is_write {
                block.mark_dirty();
            }
            self.install(set, block);
            self.stats.hits += 1;
            self.stats.victim_hits += 1;
            return AccessResult::Hit;
        }

        trace!("miss: {:#010X} set {}", addr, set);
        self.install(set, Block::new(tag, is_write));
        self.stats.misses += 1;
        self.prefetch_next(addr, prefetch_budget);
        AccessResult::Miss
    }

    /// Install a known block into this level.
    ///
    /// Used when a lower level has already resolved the access. Room is
    /// made with the usual eviction semantics, but no victim FIFO probe or
    /// prefetch happens and nothing counts as a demand hit or miss. The
    /// copy installed here is clean; the lower level keeps the
    /// authoritative one.
    pub fn fill(&mut self, addr: u32) {
        let (set, tag) = self.decode(addr);
        match self.lookup(set, tag) {
            Some(way) => self.replacement.touch(set, way),
            None => self.install(set, Block::new(tag, false)),
        }
        self.stats.fills += 1;
    }

    /// True if a valid block with this address's tag is in the set array.
    /// The victim FIFO does not count as residence.
    pub fn contains(&self, addr: u32) -> bool {
        let (set, tag) = self.decode(addr);
        self.lookup(set, tag).is_some()
    }

    /// Write back everything dirty, then drop all cached state.
    ///
    /// Stats survive; replacement counters do not.
    pub fn flush(&mut self) {
        debug!("flush: all sets, {} victim entries", self.victims.len());
        for i in 0..self.sets.len() {
            let block = self.sets[i];
            if block.is_valid() && block.is_dirty() {
                self.write_back(&block);
            }
            self.sets[i].invalidate();
        }
        for block in self.victims.drain() {
            if block.is_dirty() {
                self.write_back(&block);
            }
        }
        self.replacement.reset();
    }

    /// Attach an observer to this level's write-back notifications.
    pub fn watch_flushes(&mut self) -> Receiver<FlushEvent> {
        self.flush_port.open()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    pub fn ways(&self) -> usize {
        self.ways
    }

    fn decode(&self, addr: u32) -> (usize, u32) {
        let set = ((addr >> self.offset_bits) as usize) & self.set_mask;
        let tag = addr & self.tag_mask;
        (set, tag)
    }

    /// Definitive scan of a set for a valid, tag-matching way.
    fn lookup(&self, set: usize, tag: u32) -> Option<usize> {
        let base = set * self.ways;
        (0..self.ways).find(|&way| {
            let block = &self.sets[base + way];
            block.is_valid() && block.tag() == tag
        })
    }

    /// Make room in a set and place a block there.
    fn install(&mut self, set: usize, block: Block) {
        let way = self.make_room(set);
        self.sets[set * self.ways + way] = block;
        self.replacement.touch(set, way);
    }

    /// Free one way in a set, evicting its current resident if any.
    ///
    /// One path for every eviction: the demand miss and the victim-FIFO
    /// reinstall both come through here, so a dirty block is always
    /// flushed before its slot is disturbed and a valid block always
    /// moves into the victim FIFO rather than being discarded.
    fn make_room(&mut self, set: usize) -> usize {
        let way = self.replacement.victim_way(set);
        let mut slot = self.sets[set * self.ways + way];
        if slot.is_valid() {
            if slot.is_dirty() {
                self.write_back(&slot);
                slot.clear_dirty();
            }
            trace!("evict: set {} way {} tag {:#010X}", set, way, slot.tag());
            self.victims.insert(slot);
            self.stats.evictions += 1;
        }
        way
    }

    fn write_back(&mut self, block: &Block) {
        trace!("write back: tag {:#010X}", block.tag());
        self.flush_port.send(block.tag(), block.data());
        self.stats.write_backs += 1;
    }

    /// Speculatively pull in the next sequential block.
    ///
    /// Runs the full access path, so a prefetch can evict a resident
    /// block and can itself hit the victim FIFO. The budget is the hard
    /// ceiling: a prefetch issued with the last of it cannot speculate
    /// further.
    fn prefetch_next(&mut self, addr: u32, budget: u32) {
        if budget == 0 {
            return;
        }
        let next = addr.wrapping_add(self.block_size as u32);
        let (set, tag) = self.decode(next);
        if self.lookup(set, tag).is_some() {
            return;
        }
        trace!("prefetch: {:#010X}", next);
        self.stats.prefetches += 1;
        self.access_inner(next, false, budget - 1);
    }
}
