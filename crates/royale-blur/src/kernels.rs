use royale_special::{erf, ErfMode};

use crate::config::WeightSumMode;

/// Smallest tap count at which [`WeightSumMode::FastForLargeKernels`] and
/// [`WeightSumMode::Asymptotic`] stop summing weights.
pub const FAST_WEIGHT_SUM_MIN_TAPS: usize = 17;

/// A symmetric 1D Gaussian kernel with an odd number of taps.
///
/// Only the one-sided unnormalized weights `w(k) = exp(-k² / (2σ²))` for
/// `k = 0..=radius` are stored; `w(-k) = w(k)`. Multiply by
/// [`GaussianKernel1d::weight_sum_inv`] to normalize.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel1d {
    sigma: f32,
    weights: Vec<f32>,
    weight_sum_inv: f32,
}

impl GaussianKernel1d {
    /// Create a gaussian kernel.
    ///
    /// # Arguments
    ///
    /// * `taps` - The number of taps. Even counts are rounded down to the next odd count.
    /// * `sigma` - The standard deviation of the gaussian, in texels.
    /// * `weight_sum` - How the normalization factor is computed.
    /// * `erf_mode` - The error function precision, used by [`WeightSumMode::Asymptotic`].
    ///
    /// A non-positive `sigma` yields non-finite weights.
    ///
    /// # Examples
    ///
    /// ```
    /// use royale_blur::config::WeightSumMode;
    /// use royale_blur::kernels::GaussianKernel1d;
    /// use royale_special::ErfMode;
    ///
    /// let kernel = GaussianKernel1d::new(5, 1.0, WeightSumMode::Exact, ErfMode::Accurate);
    ///
    /// assert_eq!(kernel.taps(), 5);
    /// assert_eq!(kernel.radius(), 2);
    /// let sum: f32 = kernel.to_normalized_vec().iter().sum();
    /// assert!((sum - 1.0).abs() < 1e-6);
    /// ```
    pub fn new(taps: usize, sigma: f32, weight_sum: WeightSumMode, erf_mode: ErfMode) -> Self {
        let radius = taps.saturating_sub(1) / 2;
        let denom_inv = 0.5 / (sigma * sigma);
        let weights: Vec<f32> = (0..=radius)
            .map(|k| {
                let k = k as f32;
                (-(k * k) * denom_inv).exp()
            })
            .collect();

        let taps = 2 * radius + 1;
        let weight_sum_inv = match weight_sum {
            WeightSumMode::FastForLargeKernels if taps >= FAST_WEIGHT_SUM_MIN_TAPS => {
                fast_gaussian_weight_sum_inv(sigma)
            }
            WeightSumMode::Asymptotic if taps >= FAST_WEIGHT_SUM_MIN_TAPS => {
                asymptotic_gaussian_weight_sum_inv(sigma, erf_mode)
            }
            _ => exact_weight_sum(&weights).recip(),
        };

        Self {
            sigma,
            weights,
            weight_sum_inv,
        }
    }

    /// Create a kernel normalized by the exact weight sum.
    pub fn exact(taps: usize, sigma: f32) -> Self {
        Self::new(taps, sigma, WeightSumMode::Exact, ErfMode::Accurate)
    }

    /// The standard deviation.
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// The number of taps, always odd.
    pub fn taps(&self) -> usize {
        2 * self.radius() + 1
    }

    /// The number of taps on each side of the centre.
    pub fn radius(&self) -> usize {
        self.weights.len() - 1
    }

    /// The unnormalized weights for offsets `0..=radius`.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// The unnormalized weight at a signed offset, zero outside the kernel.
    pub fn weight(&self, offset: isize) -> f32 {
        self.weights
            .get(offset.unsigned_abs())
            .copied()
            .unwrap_or(0.0)
    }

    /// The normalization factor.
    pub fn weight_sum_inv(&self) -> f32 {
        self.weight_sum_inv
    }

    /// The sum of all unnormalized weights, `w(0) + 2 Σ w(k)`.
    pub fn weight_sum(&self) -> f32 {
        exact_weight_sum(&self.weights)
    }

    /// The full normalized kernel, ordered from offset `-radius` to `radius`.
    pub fn to_normalized_vec(&self) -> Vec<f32> {
        let radius = self.radius() as isize;
        (-radius..=radius)
            .map(|k| self.weight(k) * self.weight_sum_inv)
            .collect()
    }
}

/// Approximate `1 / Σ exp(-k² / (2σ²))` over a large symmetric kernel.
///
/// A two-parameter fit over 64 kernel sizes and 255 sigmas, max error 0.0031793913.
/// Accurate once sigma exceeds roughly 1; prefer exact sums for narrow kernels.
pub fn fast_gaussian_weight_sum_inv(sigma: f32) -> f32 {
    let fit = (0.348348412457428 / (sigma - 0.0860587260734721)).exp().exp();
    fit.min(0.399334576340352 / sigma)
}

/// The continuous Gaussian's mass over one texel, `erf(0.5 / (σ√2))`.
///
/// Converges to the exact normalization as the kernel grows wide and untruncated.
pub fn asymptotic_gaussian_weight_sum_inv(sigma: f32, erf_mode: ErfMode) -> f32 {
    erf(0.5 / (sigma * std::f32::consts::SQRT_2), erf_mode)
}

/// Unnormalized 2D Gaussian weight at a texel offset.
pub fn gaussian_weight_2d(dx: f32, dy: f32, sigma: f32) -> f32 {
    (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
}

fn exact_weight_sum(weights: &[f32]) -> f32 {
    let tail: f64 = weights.iter().skip(1).map(|&w| w as f64).sum();
    let centre = weights.first().copied().unwrap_or(0.0) as f64;
    (centre + 2.0 * tail) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StdDevRegime, PRESET_WIDTHS};
    use approx::assert_relative_eq;

    #[test]
    fn kernel_shape() {
        let kernel = GaussianKernel1d::exact(7, 1.5);
        assert_eq!(kernel.taps(), 7);
        assert_eq!(kernel.radius(), 3);
        assert_eq!(kernel.weights().len(), 4);
        assert_eq!(kernel.weight(0), 1.0);
        assert_eq!(kernel.weight(-2), kernel.weight(2));
        assert_eq!(kernel.weight(4), 0.0);
        assert_relative_eq!(kernel.weight(1), (-1.0f32 / 4.5).exp());
    }

    #[test]
    fn even_taps_round_down() {
        assert_eq!(GaussianKernel1d::exact(4, 1.0).taps(), 3);
        assert_eq!(GaussianKernel1d::exact(12, 1.0).taps(), 11);
        assert_eq!(GaussianKernel1d::exact(0, 1.0).taps(), 1);
    }

    #[test]
    fn kernels_symmetric_and_normalized() {
        for taps in (1..=43).step_by(2) {
            for sigma in [0.25f32, 0.5, 1.0, 2.0, 3.7, 10.0, 40.0] {
                let kernel = GaussianKernel1d::exact(taps, sigma);
                let full = kernel.to_normalized_vec();
                assert_eq!(full.len(), taps);
                for (a, b) in full.iter().zip(full.iter().rev()) {
                    assert_eq!(a, b);
                }
                assert!(full.iter().all(|&w| w >= 0.0));
                let sum: f64 = full.iter().map(|&w| w as f64).sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn small_kernels_ignore_weight_sum_mode() {
        let exact = GaussianKernel1d::exact(11, 2.0);
        for mode in [WeightSumMode::FastForLargeKernels, WeightSumMode::Asymptotic] {
            let kernel = GaussianKernel1d::new(11, 2.0, mode, ErfMode::Accurate);
            assert_eq!(kernel.weight_sum_inv(), exact.weight_sum_inv());
        }
    }

    #[test]
    fn fast_weight_sum_fit() {
        let presets = StdDevRegime::Default.presets();
        for (i, &taps) in PRESET_WIDTHS.iter().enumerate() {
            if taps < FAST_WEIGHT_SUM_MIN_TAPS {
                continue;
            }
            let sigma = presets[i];
            let exact = GaussianKernel1d::exact(taps, sigma).weight_sum_inv();
            let fast = GaussianKernel1d::new(
                taps,
                sigma,
                WeightSumMode::FastForLargeKernels,
                ErfMode::Accurate,
            )
            .weight_sum_inv();
            assert!((fast - exact).abs() <= 0.0032, "taps {taps}");
        }
    }

    #[test]
    fn asymptotic_weight_sum() {
        // untruncated: radius of about ten sigma
        let exact = GaussianKernel1d::exact(201, 10.1852050781).weight_sum_inv();
        let asymptotic = asymptotic_gaussian_weight_sum_inv(10.1852050781, ErfMode::Accurate);
        assert_relative_eq!(asymptotic, exact, max_relative = 1e-3);

        let kernel = GaussianKernel1d::new(25, 2.0, WeightSumMode::Asymptotic, ErfMode::Fast);
        assert_eq!(
            kernel.weight_sum_inv(),
            asymptotic_gaussian_weight_sum_inv(2.0, ErfMode::Fast)
        );
    }

    #[test]
    fn weight_2d_is_separable() {
        let sigma = 1.3;
        let k = GaussianKernel1d::exact(5, sigma);
        assert_relative_eq!(
            gaussian_weight_2d(1.0, 2.0, sigma),
            k.weight(1) * k.weight(2),
            max_relative = 1e-6
        );
    }

    #[test]
    fn invalid_sigma_is_not_finite() {
        let kernel = GaussianKernel1d::exact(5, 0.0);
        assert!(!kernel.to_normalized_vec().iter().all(|w| w.is_finite()));
    }
}
