#![deny(missing_docs)]
//! Image types used as sample sources and destinations for the blur operators.

/// The `Image` container and its pixel accessors.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
