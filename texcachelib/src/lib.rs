//! # TexCacheLib
//!
//! TexCacheLib measures how the block layout of a compressed texture and the order its texels are
//! read in affect cache locality
//!
//! It provides a small fully associative LRU cache, the raster, morton, and random access
//! patterns, and textures which map each texel onto the compressed bytes it needs: fixed size ASTC
//! blocks, and adaptive formats whose block sizes vary per region and are recorded in a metadata
//! table built from a colour coded reference image
//!
//! Everything is single threaded and deterministic, the random pattern owns a seeded generator

/// Contains the cache model and the trait textures read through
pub mod cache;

/// Contains the access patterns used to walk a texture
pub mod access_pattern;

/// Contains the texture formats and their address mapping
pub mod texture;

/// Contains the colour coded reference images adaptive textures are built from
pub mod reference;

/// Contains the duplicate map format
pub mod duplicates;

/// Contains definitions for the JSON input format
pub mod config;

/// Contains the error type shared by the library
pub mod error;

/// Contains helpers for reading input files
pub mod io;

/// Contains the simulator used to run every access pattern over a texture
pub mod simulator;

#[cfg(test)]
mod test;

/// Contains utilities for building inputs in tests and benchmarks.
pub mod util;
