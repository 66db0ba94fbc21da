#![deny(missing_docs)]
//! Special-function approximations tuned for per-pixel evaluation.
//!
//! The error function, the complete gamma function and the regularized lower
//! incomplete gamma function for small shape parameters. Each function is generic
//! over [`Lanes`], so it accepts `f32`, `f64` or fixed-size arrays of either.

/// Error function approximations.
pub mod erf;

/// Complete gamma function approximation.
pub mod gamma;

/// Incomplete gamma function approximations for small shape parameters.
pub mod incomplete_gamma;

mod lanes;

pub use crate::erf::{erf, erf6, erft, ErfMode};
pub use crate::gamma::{gamma, gamma_impl};
pub use crate::incomplete_gamma::{
    ligamma_small_z_impl, normalized_ligamma, normalized_ligamma_impl, uigamma_large_z_impl,
    LIGAMMA_BRANCH_THRESHOLD,
};
pub use crate::lanes::Lanes;
