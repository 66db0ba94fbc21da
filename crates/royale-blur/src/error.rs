use royale_image::ImageError;

use crate::blur::BlurVariant;

/// An error type for blur construction and the image-level drivers.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BlurError {
    /// The blur variant cannot be built with the requested tap count.
    #[error("{variant} blur does not support {taps} taps")]
    UnsupportedWidth {
        /// The requested variant.
        variant: BlurVariant,
        /// The requested tap count.
        taps: usize,
    },

    /// The standard deviation is zero, negative or not finite.
    #[error("Standard deviation must be finite and positive, got {0}")]
    InvalidStdDev(f32),

    /// No preset standard deviation exists for the blur width.
    #[error("No preset standard deviation for a blur width of {0}")]
    NoPresetStdDev(usize),

    /// The shared-sample error blurring weight is outside [0, 1].
    #[error("Error blurring must lie in [0, 1], got {0}")]
    InvalidErrorBlurring(f32),

    /// A gamma exponent is zero, negative or not finite.
    #[error("Gamma must be finite and positive, got {0}")]
    InvalidGamma(f32),

    /// The local thread pool failed to build.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),

    /// An image operation failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}
