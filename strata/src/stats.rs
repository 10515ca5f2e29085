/// Event counters for one cache level.
///
/// A victim-cache hit bumps both `hits` and `victim_hits`. Prefetch
/// accesses run the normal access path, so their outcomes land in `hits`
/// and `misses` too; `prefetches` counts how many were issued. Fills are
/// not demand accesses and only count in `fills`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheStats {
    pub hits:           u64,
    pub misses:         u64,
    pub victim_hits:    u64,
    pub evictions:      u64,
    pub write_backs:    u64,
    pub prefetches:     u64,
    pub fills:          u64,
}

impl CacheStats {
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        if self.accesses() == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses() as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
