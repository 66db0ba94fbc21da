#![deny(missing_docs)]
//! Gaussian blur operators for real-time image filtering.
//!
//! Kernels are synthesized for any standard deviation, adjacent taps are merged into
//! single bilinear fetches, and every fetch passes through a gamma-aware gateway so
//! filtering happens in linear light.

/// Blur variants and the cached blur plan.
pub mod blur;

/// Blur configuration and preset standard deviations.
pub mod config;

/// Error types for the blur module.
pub mod error;

/// Image-level blur drivers.
pub mod filter;

/// Gamma decode and encode for pipeline stages.
pub mod gamma;

/// Gaussian kernel synthesis and normalization.
pub mod kernels;

/// One-pass 2D blurs.
pub mod one_pass;

/// Row-parallel execution helpers.
pub mod parallel;

/// Sample sources and stride vectors.
pub mod sampler;

/// Separable 1D blurs.
pub mod separable;

/// Bilinear tap compression.
pub mod taps;

/// Textures with filter modes and mip chains.
pub mod texture;

pub use crate::blur::{Blur, BlurVariant};
pub use crate::config::{BlurConfig, StdDevRegime, StdDevTable, WeightSumMode};
pub use crate::error::BlurError;
