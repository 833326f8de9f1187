use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::access_pattern::{GenericAccessPattern, Morton, RandomOrder, Raster};
use crate::error::SimError;
use crate::texture::{create_adaptive, create_fixed, GenericTexture, TextureFormat};

/// A full simulation: one texture walked in several orders through one cache
#[derive(Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_cache_size")]
    pub cache_size: u64,
    pub texture: TextureConfig,
    #[serde(default = "default_patterns")]
    pub patterns: Vec<AccessPatternConfig>,
    /// Seeds the random access pattern
    #[serde(default)]
    pub seed: u64,
}

/// 1KB, 16 lines
fn default_cache_size() -> u64 {
    1024
}

fn default_patterns() -> Vec<AccessPatternConfig> {
    vec![AccessPatternConfig::Random, AccessPatternConfig::Morton, AccessPatternConfig::Raster]
}

/// The texture to simulate - a fixed block format with its dimensions, or an adaptive format with
/// the files it is built from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureConfig {
    Fixed {
        format: TextureFormat,
        width: u32,
        height: u32,
    },
    Adaptive {
        format: TextureFormat,
        duplicate_map: String,
        reference_image: String,
    },
}

/// The order texels are read in - raster, morton, or random
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AccessPatternConfig {
    #[serde(alias = "raster")]
    Raster,
    #[serde(alias = "morton", alias = "z")]
    Morton,
    #[serde(alias = "random")]
    Random,
}

impl TextureConfig {
    pub fn format(&self) -> TextureFormat {
        match self {
            TextureConfig::Fixed { format, .. } | TextureConfig::Adaptive { format, .. } => *format,
        }
    }

    /// Creates the configured texture, loading the adaptive inputs from disk if needed
    pub fn build(&self) -> Result<GenericTexture, SimError> {
        match self {
            TextureConfig::Fixed { format, width, height } => create_fixed(*format, *width, *height),
            TextureConfig::Adaptive { format, duplicate_map, reference_image } => {
                create_adaptive(*format, Path::new(duplicate_map), Path::new(reference_image))
            }
        }
    }
}

impl AccessPatternConfig {
    /// Creates the pattern, the random pattern gets its own generator seeded with `seed`
    pub fn build(&self, seed: u64) -> GenericAccessPattern {
        match self {
            AccessPatternConfig::Raster => Raster.into(),
            AccessPatternConfig::Morton => Morton.into(),
            AccessPatternConfig::Random => RandomOrder::from_seed(seed).into(),
        }
    }
}

impl SimulationConfig {
    pub fn build_patterns(&self) -> Vec<GenericAccessPattern> {
        self.patterns.iter().map(|p| p.build(self.seed)).collect()
    }
}
