use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::cache::CacheTrait;
use crate::texture::Texture;

/// A texel coordinate, `(x, y)`
pub type Sample = (u32, u32);

/// A generic trait for the orders a texture can be walked in
pub trait AccessPattern {

    /// Enumerates every texel of a `w` by `h` grid exactly once, in the order of this pattern
    fn generate_samples(&mut self, w: u32, h: u32) -> Vec<Sample>;

    /// Walks the whole texture in the order of this pattern, reading each texel through the cache
    ///
    /// # Arguments
    ///
    /// * `texture`: The texture to read from, which maps each texel to its cache accesses
    /// * `cache`: The cache to simulate the reads on
    ///
    /// returns: (), results are collected by the cache
    fn run<T: Texture, C: CacheTrait>(&mut self, texture: &T, cache: &mut C) {
        let samples = self.generate_samples(texture.get_width(), texture.get_height());
        assert_eq!(
            samples.len(),
            texture.get_width() as usize * texture.get_height() as usize,
            "access pattern must visit every texel exactly once"
        );
        for (x, y) in samples {
            texture.access(x, y, cache);
        }
    }
}

/// Row major order, left to right then top to bottom
#[derive(Debug, Default, Copy, Clone)]
pub struct Raster;

impl AccessPattern for Raster {
    fn generate_samples(&mut self, w: u32, h: u32) -> Vec<Sample> {
        let mut samples = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                samples.push((x, y));
            }
        }
        samples
    }
}

/// Morton (Z-order), the bits of a linear index are split between the two coordinates
///
/// The pattern walks the index space `[0, w * h)`, so it only covers the grid when the dimensions
/// allow it, e.g. equal powers of two, or a power of two width twice the height. This is a
/// precondition on the caller, coordinates are not re-validated.
#[derive(Debug, Default, Copy, Clone)]
pub struct Morton;

/// Splits an index into its even bits (x) and odd bits (y)
///
/// # Examples
///
/// ```
/// use texcachelib::access_pattern::deinterleave;
/// assert_eq!(deinterleave(0b1110), (0b10, 0b11));
/// ```
pub fn deinterleave(index: u64) -> Sample {
    let mut x = 0u32;
    let mut y = 0u32;
    let mut bit = 0;
    let mut remaining = index;
    while remaining != 0 {
        x |= ((remaining & 1) as u32) << bit;
        y |= (((remaining >> 1) & 1) as u32) << bit;
        remaining >>= 2;
        bit += 1;
    }
    (x, y)
}

impl AccessPattern for Morton {
    fn generate_samples(&mut self, w: u32, h: u32) -> Vec<Sample> {
        let count = w as u64 * h as u64;
        (0..count).map(deinterleave).collect()
    }
}

/// Raster order shuffled with a Fisher-Yates pass driven by an owned generator
///
/// The generator is never shared, so two patterns seeded alike always produce the same order
pub struct RandomOrder<R: Rng = StdRng> {
    rng: R,
}

impl RandomOrder<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomOrder<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> AccessPattern for RandomOrder<R> {
    fn generate_samples(&mut self, w: u32, h: u32) -> Vec<Sample> {
        let mut samples = Raster.generate_samples(w, h);
        let len = samples.len();
        for i in 0..len.saturating_sub(1) {
            let j = self.rng.gen_range(i..len);
            samples.swap(i, j);
        }
        samples
    }
}

/// Enum for the three provided access patterns
///
/// Like the caches, it's much faster to explicitly branch on the implementations than to use
/// trait objects, and the set of patterns is closed
pub enum GenericAccessPattern {
    Raster(Raster),
    Morton(Morton),
    Random(RandomOrder<StdRng>),
}

impl GenericAccessPattern {
    pub fn name(&self) -> &'static str {
        match self {
            GenericAccessPattern::Raster(_) => "raster",
            GenericAccessPattern::Morton(_) => "morton",
            GenericAccessPattern::Random(_) => "random",
        }
    }
}

impl From<Raster> for GenericAccessPattern {
    fn from(value: Raster) -> Self {
        Self::Raster(value)
    }
}

impl From<Morton> for GenericAccessPattern {
    fn from(value: Morton) -> Self {
        Self::Morton(value)
    }
}

impl From<RandomOrder<StdRng>> for GenericAccessPattern {
    fn from(value: RandomOrder<StdRng>) -> Self {
        Self::Random(value)
    }
}

impl AccessPattern for GenericAccessPattern {
    fn generate_samples(&mut self, w: u32, h: u32) -> Vec<Sample> {
        match self {
            GenericAccessPattern::Raster(p) => p.generate_samples(w, h),
            GenericAccessPattern::Morton(p) => p.generate_samples(w, h),
            GenericAccessPattern::Random(p) => p.generate_samples(w, h),
        }
    }
}
