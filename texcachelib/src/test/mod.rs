use crate::cache::{CacheStats, CacheTrait, LINE_SIZE};

mod adaptive_tests;

/// Records the line addresses it is asked for, every access is a miss
#[derive(Default)]
pub struct RecordingCache {
    pub addresses: Vec<u64>,
}

impl CacheTrait for RecordingCache {
    fn access(&mut self, address: u64) -> bool {
        self.addresses.push(address);
        false
    }

    fn stats(&self) -> CacheStats {
        let accesses = self.addresses.len() as u64;
        CacheStats {
            hits: 0,
            misses: accesses,
            accesses,
        }
    }

    fn clear(&mut self) {
        self.addresses.clear();
    }

    fn get_line_size(&self) -> u64 {
        LINE_SIZE
    }

    fn get_uninitialised_line_count(&self) -> usize {
        0
    }
}
