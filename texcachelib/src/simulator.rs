use std::time::{Duration, Instant};
use log::debug;
use serde::{Deserialize, Serialize};
use crate::access_pattern::{AccessPattern, GenericAccessPattern};
use crate::cache::{Cache, CacheTrait};
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::texture::{GenericTexture, Texture};

/// The simulator walks one texture in each access pattern, collecting cache statistics per pattern
///
/// The cache is cleared before every pattern, so each run starts cold. It supports calling simulate
/// multiple times, and will update the time taken to simulate and the results accordingly
pub struct Simulator {
    cache: Cache,
    texture: GenericTexture,
    result: SimulationResult,
    simulation_time: Duration,
}

/// The result of a simulation. Can be serialised for output
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub cache_size: u64,
    pub width: u32,
    pub height: u32,
    pub patterns: Vec<PatternResult>,
}

/// The cache statistics of one access pattern
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct PatternResult {
    pub pattern: String,
    pub hits: u64,
    pub misses: u64,
    pub accesses: u64,
}

impl Simulator {

    /// Creates a new simulator for a texture
    ///
    /// # Arguments
    ///
    /// * `cache_size`: The cache capacity in bytes
    /// * `texture`: The texture to walk
    ///
    /// returns: Result<Simulator, SimError>
    pub fn new(cache_size: u64, texture: GenericTexture) -> Result<Self, SimError> {
        let cache = Cache::new(cache_size)?;
        let result = SimulationResult {
            cache_size,
            width: texture.get_width(),
            height: texture.get_height(),
            patterns: Vec::new(),
        };
        Ok(Self {
            cache,
            texture,
            result,
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Creates a simulator from a parsed configuration, building its texture
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimError> {
        Self::new(config.cache_size, config.texture.build()?)
    }

    /// Runs every pattern in order, each on a cleared cache
    ///
    /// # Arguments
    ///
    /// * `patterns`: The access patterns, the random pattern advances its generator
    ///
    /// returns: &SimulationResult
    pub fn simulate(&mut self, patterns: &mut [GenericAccessPattern]) -> &SimulationResult {
        let start = Instant::now();
        for pattern in patterns.iter_mut() {
            self.cache.clear();
            pattern.run(&self.texture, &mut self.cache);
            let stats = self.cache.stats();
            debug!("{} pattern: {stats:?}", pattern.name());
            self.result.patterns.push(PatternResult {
                pattern: pattern.name().to_string(),
                hits: stats.hits,
                misses: stats.misses,
                accesses: stats.accesses,
            });
        }
        let end = Instant::now();
        self.simulation_time += end - start;
        &self.result
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of lines left invalid by the last pattern
    pub fn get_uninitialised_line_count(&self) -> usize {
        self.cache.get_uninitialised_line_count()
    }

    pub fn texture(&self) -> &GenericTexture {
        &self.texture
    }
}
