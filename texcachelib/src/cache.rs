use serde::{Deserialize, Serialize};
use crate::error::SimError;

/// Every cache line covers 64 bytes
pub const LINE_SIZE: u64 = 64;

const ALIGNMENT_BIT_MASK: u64 = !(LINE_SIZE - 1);

/// A generic trait for caches the textures can read through
///
/// Implementations only need to provide single line accesses, splitting reads which span multiple
/// lines is handled by `access_range`
pub trait CacheTrait {

    /// Reads the line containing an address, updating hit/miss counters and recency
    ///
    /// # Arguments
    ///
    /// * `address`: Any address within the line, it is aligned down by the cache
    ///
    /// returns: bool, true on a hit and false on a miss
    fn access(&mut self, address: u64) -> bool;

    /// Reads `num_bytes` bytes starting at `address`, touching every line the span covers exactly
    /// once, in increasing address order
    ///
    /// Reads of zero or one byte behave exactly like `access`
    ///
    /// # Arguments
    ///
    /// * `address`: The address of the first byte
    /// * `num_bytes`: The size of the read in bytes
    ///
    /// returns: (), the counters are updated per line
    fn access_range(&mut self, address: u64, num_bytes: u64) {
        if num_bytes <= 1 {
            self.access(address);
            return;
        }
        let line_size = self.get_line_size();
        let end_address = (address + num_bytes - 1) & !(line_size - 1);
        let mut current_aligned_address = address & !(line_size - 1);
        assert!(end_address >= current_aligned_address, "byte range must cover a positive span");
        while current_aligned_address <= end_address {
            self.access(current_aligned_address);
            current_aligned_address += line_size;
        }
    }

    /// Gets the hit, miss and access counters
    fn stats(&self) -> CacheStats;

    /// Invalidates every line and resets all counters and the logical clock
    fn clear(&mut self);

    /// Gets the line size used by this cache
    fn get_line_size(&self) -> u64;

    /// Gets the number of uninitialised cache lines. Useful for analysing cache performance or
    /// debugging
    fn get_uninitialised_line_count(&self) -> usize;
}

/// Counters collected by a cache. `hits + misses == accesses` always holds
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub accesses: u64,
}

#[derive(Debug, Default, Copy, Clone)]
pub struct CacheLine {
    pub tag: u64,
    pub last_used: u64,
    pub valid: bool,
}

/// A fully associative, read-only cache with 64 byte lines and least recently used replacement
///
/// There is no set indexing, every access scans every line. The capacities of interest are tiny
/// (16 lines for 1KB) so the scan is cheap, and it keeps victim selection exact:
///
/// * the first invalid line found wins outright
/// * otherwise the line with the oldest timestamp is evicted, the earliest line in scan order wins
/// ties
pub struct Cache {
    lines: Vec<CacheLine>,
    // Logical clock, advanced once per line access
    time: u64,
    stats: CacheStats,
}

impl Cache {

    /// Creates an empty cache holding `size / 64` lines
    ///
    /// # Arguments
    ///
    /// * `size`: The capacity in bytes, must hold at least one line
    ///
    /// returns: Result<Cache, SimError>
    pub fn new(size: u64) -> Result<Self, SimError> {
        let num_lines = size / LINE_SIZE;
        if num_lines == 0 {
            return Err(SimError::Configuration(format!(
                "a cache of {size} bytes can't hold a single {LINE_SIZE} byte line"
            )));
        }
        Ok(Self {
            lines: vec![CacheLine::default(); num_lines as usize],
            time: 0,
            stats: CacheStats::default(),
        })
    }

    pub fn get_line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Looks up an aligned tag, returning the index of the matching line on a hit, or the index of
    /// the line to replace on a miss
    fn find_line(&self, tag: u64) -> Result<usize, usize> {
        let mut victim: Option<usize> = None;
        let mut found_invalid = false;
        for (index, line) in self.lines.iter().enumerate() {
            if line.valid {
                if line.tag == tag {
                    return Ok(index);
                }
                if found_invalid {
                    continue;
                }
                // Strictly older only, so the earliest line wins ties
                if victim.map_or(true, |v| line.last_used < self.lines[v].last_used) {
                    victim = Some(index);
                }
            } else if !found_invalid {
                found_invalid = true;
                victim = Some(index);
            }
        }
        // new() guarantees at least one line
        Err(victim.unwrap_or(0))
    }
}

impl CacheTrait for Cache {
    fn access(&mut self, address: u64) -> bool {
        self.time += 1;
        self.stats.accesses += 1;
        let tag = address & ALIGNMENT_BIT_MASK;
        match self.find_line(tag) {
            Ok(index) => {
                self.stats.hits += 1;
                self.lines[index].last_used = self.time;
                true
            }
            Err(index) => {
                self.stats.misses += 1;
                self.lines[index] = CacheLine {
                    tag,
                    last_used: self.time,
                    valid: true,
                };
                false
            }
        }
    }

    fn stats(&self) -> CacheStats {
        self.stats
    }

    fn clear(&mut self) {
        for line in self.lines.iter_mut() {
            line.valid = false;
        }
        self.time = 0;
        self.stats = CacheStats::default();
    }

    fn get_line_size(&self) -> u64 {
        LINE_SIZE
    }

    fn get_uninitialised_line_count(&self) -> usize {
        self.lines.iter().filter(|line| !line.valid).count()
    }
}
