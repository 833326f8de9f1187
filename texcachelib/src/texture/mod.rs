use std::fmt;
use std::path::Path;
use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::cache::CacheTrait;
use crate::duplicates::DuplicateMap;
use crate::error::SimError;
use crate::reference::ReferenceImage;

/// Fixed size ASTC textures
pub mod fixed;

/// The metadata table and access path shared by both adaptive formats
pub mod adaptive;

/// Construction of the adaptive format with a 4x4 minimal cell
pub mod adaptive4x4;

/// Construction of the adaptive format with a 12x12 minimal cell
pub mod adaptive12x12;

pub use adaptive::{AdaptiveTexture, BlockMetadata, BlockType, Corner};
pub use fixed::FixedBlockTexture;

/// Every compressed block, fixed or adaptive, is 16 bytes
pub const BLOCK_BYTES: u64 = 16;

/// A texture maps each texel to the compressed bytes it depends on
pub trait Texture {
    fn get_width(&self) -> u32;

    fn get_height(&self) -> u32;

    /// Issues the cache reads needed to decode the texel at `(x, y)`
    ///
    /// The reads are deterministic, the same texel always produces the same sequence
    fn access<C: CacheTrait>(&self, x: u32, y: u32, cache: &mut C);
}

/// The supported texture formats
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextureFormat {
    Astc4x4,
    Astc6x6,
    Astc8x8,
    Astc12x12,
    Adaptive4x4,
    Adaptive12x12,
}

lazy_static! {
    static ref FORMAT_PATTERN: Regex =
        Regex::new(r"(?i)^(?P<kind>astc|adaptive)[_-]?(?P<w>[0-9]+)x(?P<h>[0-9]+)$").unwrap();
}

impl TextureFormat {
    /// The block dimensions of a fixed format, `None` for the adaptive formats
    pub fn block_dimensions(&self) -> Option<(u32, u32)> {
        match self {
            TextureFormat::Astc4x4 => Some((4, 4)),
            TextureFormat::Astc6x6 => Some((6, 6)),
            TextureFormat::Astc8x8 => Some((8, 8)),
            TextureFormat::Astc12x12 => Some((12, 12)),
            TextureFormat::Adaptive4x4 | TextureFormat::Adaptive12x12 => None,
        }
    }

    pub fn is_adaptive(&self) -> bool {
        self.block_dimensions().is_none()
    }
}

impl FromStr for TextureFormat {
    type Err = SimError;

    /// Parses a format name such as `ASTC8x8` or `adaptive12x12`, ignoring case
    ///
    /// # Examples
    ///
    /// ```
    /// use texcachelib::texture::TextureFormat;
    /// assert_eq!("ASTC8x8".parse::<TextureFormat>().unwrap(), TextureFormat::Astc8x8);
    /// assert!("ASTC5x5".parse::<TextureFormat>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || SimError::Configuration(format!("unsupported texture format {s}"));
        let tokens = FORMAT_PATTERN.captures(s.trim()).ok_or_else(unsupported)?;
        let adaptive = tokens["kind"].eq_ignore_ascii_case("adaptive");
        let format = match (adaptive, &tokens["w"], &tokens["h"]) {
            (false, "4", "4") => TextureFormat::Astc4x4,
            (false, "6", "6") => TextureFormat::Astc6x6,
            (false, "8", "8") => TextureFormat::Astc8x8,
            (false, "12", "12") => TextureFormat::Astc12x12,
            (true, "4", "4") => TextureFormat::Adaptive4x4,
            (true, "12", "12") => TextureFormat::Adaptive12x12,
            _ => return Err(unsupported()),
        };
        Ok(format)
    }
}

impl TryFrom<String> for TextureFormat {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextureFormat> for String {
    fn from(value: TextureFormat) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureFormat::Astc4x4 => "ASTC4x4",
            TextureFormat::Astc6x6 => "ASTC6x6",
            TextureFormat::Astc8x8 => "ASTC8x8",
            TextureFormat::Astc12x12 => "ASTC12x12",
            TextureFormat::Adaptive4x4 => "adaptive4x4",
            TextureFormat::Adaptive12x12 => "adaptive12x12",
        };
        f.write_str(name)
    }
}

/// Enum for both texture layouts, dispatched statically like the caches and access patterns
pub enum GenericTexture {
    FixedBlock(FixedBlockTexture),
    Adaptive(AdaptiveTexture),
}

impl From<FixedBlockTexture> for GenericTexture {
    fn from(value: FixedBlockTexture) -> Self {
        Self::FixedBlock(value)
    }
}

impl From<AdaptiveTexture> for GenericTexture {
    fn from(value: AdaptiveTexture) -> Self {
        Self::Adaptive(value)
    }
}

impl Texture for GenericTexture {
    fn get_width(&self) -> u32 {
        match self {
            GenericTexture::FixedBlock(t) => t.get_width(),
            GenericTexture::Adaptive(t) => t.get_width(),
        }
    }

    fn get_height(&self) -> u32 {
        match self {
            GenericTexture::FixedBlock(t) => t.get_height(),
            GenericTexture::Adaptive(t) => t.get_height(),
        }
    }

    fn access<C: CacheTrait>(&self, x: u32, y: u32, cache: &mut C) {
        match self {
            GenericTexture::FixedBlock(t) => t.access(x, y, cache),
            GenericTexture::Adaptive(t) => t.access(x, y, cache),
        }
    }
}

/// Creates a fixed block texture of the given pixel dimensions
///
/// # Arguments
///
/// * `format`: One of the ASTC formats, adaptive formats need `create_adaptive`
/// * `width`: Width in pixels
/// * `height`: Height in pixels
///
/// returns: Result<GenericTexture, SimError>
pub fn create_fixed(format: TextureFormat, width: u32, height: u32) -> Result<GenericTexture, SimError> {
    let (block_w, block_h) = format.block_dimensions().ok_or_else(|| {
        SimError::Configuration(format!("{format} needs a duplicate map and a reference image"))
    })?;
    Ok(FixedBlockTexture::new(width, height, block_w, block_h)?.into())
}

/// Creates an adaptive texture from its duplicate map and reference visualisation on disk
///
/// The texture takes the dimensions of the reference image, truncated to a multiple of 12
///
/// # Arguments
///
/// * `format`: One of the adaptive formats
/// * `duplicate_map`: Path of the duplicate map text file
/// * `reference_image`: Path of the colour coded reference image
///
/// returns: Result<GenericTexture, SimError>
pub fn create_adaptive(format: TextureFormat, duplicate_map: &Path, reference_image: &Path) -> Result<GenericTexture, SimError> {
    let reference = ReferenceImage::open(reference_image)?;
    let duplicates = DuplicateMap::open(duplicate_map)?;
    build_adaptive(format, &reference, &duplicates)
}

/// Builds an adaptive texture from an already loaded reference image and duplicate map
pub fn build_adaptive(format: TextureFormat, reference: &ReferenceImage, duplicates: &DuplicateMap) -> Result<GenericTexture, SimError> {
    let texture = match format {
        TextureFormat::Adaptive4x4 => adaptive4x4::build(reference, duplicates)?,
        TextureFormat::Adaptive12x12 => adaptive12x12::build(reference, duplicates)?,
        _ => {
            return Err(SimError::Configuration(format!(
                "{format} is a fixed block format, it has no adaptive metadata"
            )))
        }
    };
    Ok(texture.into())
}
