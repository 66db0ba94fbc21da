use royale_special::ErfMode;

use crate::error::BlurError;

/// Blur widths that carry a preset standard deviation.
pub const PRESET_WIDTHS: [usize; 14] = [3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 17, 25, 31, 43];

// Largest sigma keeping the outermost tap at or below 1/256 of the centre weight.
static DEFAULT_STD_DEVS: [f32; 14] = [
    0.62666015625,
    0.66171875,
    0.9845703125,
    1.02626953125,
    1.36103515625,
    1.4080078125,
    1.7533203125,
    1.80478515625,
    2.15986328125,
    2.215234375,
    3.45535583496,
    5.3409576416,
    6.86488037109,
    10.1852050781,
];

// Sigma whose repeated application best matches one wider binomial blur.
static BINOMIAL_STD_DEVS: [f32; 14] = [
    0.84931640625,
    0.84931640625,
    1.0595703125,
    1.06591796875,
    1.17041015625,
    1.1720703125,
    1.2259765625,
    1.21982421875,
    1.25361328125,
    1.2423828125,
    1.27783203125,
    1.2810546875,
    1.28125,
    1.28125,
];

/// Which family of preset standard deviations to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StdDevRegime {
    /// The largest sigma whose smallest kept tap stays at or below 1/256 of the centre.
    #[default]
    Default,
    /// Sigma tuned so repeated passes approximate a single larger binomial blur.
    Binomial,
}

impl StdDevRegime {
    /// The static preset table for this regime, indexed like [`PRESET_WIDTHS`].
    pub fn presets(&self) -> &'static [f32; 14] {
        match self {
            StdDevRegime::Default => &DEFAULT_STD_DEVS,
            StdDevRegime::Binomial => &BINOMIAL_STD_DEVS,
        }
    }
}

/// How a kernel's normalization factor is obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightSumMode {
    /// Always sum the weights.
    Exact,
    /// Sum the weights below 17 taps, use a curve fit at 17 taps and above.
    #[default]
    FastForLargeKernels,
    /// Sum the weights below 17 taps, use the continuous Gaussian's centre
    /// integral at 17 taps and above.
    Asymptotic,
}

/// Preset standard deviations for one regime, with optional per-width overrides.
///
/// # Examples
///
/// ```
/// use royale_blur::config::{StdDevRegime, StdDevTable};
///
/// let table = StdDevTable::new(StdDevRegime::Default).with_override(5, 1.5).unwrap();
///
/// assert_eq!(table.std_dev(5), Some(1.5));
/// assert_eq!(table.std_dev(3), Some(0.62666015625));
/// assert_eq!(table.std_dev(13), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StdDevTable {
    regime: StdDevRegime,
    overrides: [Option<f32>; 14],
}

impl StdDevTable {
    /// Create a table for the given regime with no overrides.
    pub fn new(regime: StdDevRegime) -> Self {
        Self {
            regime,
            overrides: [None; 14],
        }
    }

    /// The preset regime in use.
    pub fn regime(&self) -> StdDevRegime {
        self.regime
    }

    /// Replace the standard deviation for one preset width.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::NoPresetStdDev`] if `width` is not one of [`PRESET_WIDTHS`],
    /// or [`BlurError::InvalidStdDev`] if `sigma` is not finite and positive.
    pub fn with_override(mut self, width: usize, sigma: f32) -> Result<Self, BlurError> {
        let idx = preset_index(width).ok_or(BlurError::NoPresetStdDev(width))?;
        validate_std_dev(sigma)?;
        self.overrides[idx] = Some(sigma);
        Ok(self)
    }

    /// The standard deviation for `width`, or `None` if the width has no preset.
    pub fn std_dev(&self, width: usize) -> Option<f32> {
        let idx = preset_index(width)?;
        Some(self.overrides[idx].unwrap_or(self.regime.presets()[idx]))
    }
}

/// Blur configuration, resolved once and shared read-only by every sample.
///
/// # Examples
///
/// ```
/// use royale_blur::config::{BlurConfig, StdDevRegime, WeightSumMode};
///
/// let config = BlurConfig::new()
///     .with_regime(StdDevRegime::Binomial)
///     .with_weight_sum(WeightSumMode::Exact)
///     .with_error_blurring(0.25)
///     .unwrap();
///
/// assert_eq!(config.std_dev(43), Some(1.28125));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlurConfig {
    std_devs: StdDevTable,
    erf_mode: ErfMode,
    weight_sum: WeightSumMode,
    error_blurring: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            std_devs: StdDevTable::default(),
            erf_mode: ErfMode::default(),
            weight_sum: WeightSumMode::default(),
            error_blurring: 0.5,
        }
    }
}

impl BlurConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the preset regime, keeping any overrides.
    pub fn with_regime(mut self, regime: StdDevRegime) -> Self {
        self.std_devs.regime = regime;
        self
    }

    /// Override the preset standard deviation for one width.
    ///
    /// # Errors
    ///
    /// See [`StdDevTable::with_override`].
    pub fn with_std_dev(mut self, width: usize, sigma: f32) -> Result<Self, BlurError> {
        self.std_devs = self.std_devs.with_override(width, sigma)?;
        Ok(self)
    }

    /// Set the error function precision.
    pub fn with_erf_mode(mut self, erf_mode: ErfMode) -> Self {
        self.erf_mode = erf_mode;
        self
    }

    /// Set how kernels are normalized.
    pub fn with_weight_sum(mut self, weight_sum: WeightSumMode) -> Self {
        self.weight_sum = weight_sum;
        self
    }

    /// Set the shared-sample error blurring weight.
    ///
    /// 0 keeps features sharp at the cost of ringing, 1 suppresses ringing with extra
    /// blur and feature shift. Reserved for shared-sample blurs, so it does not change
    /// the output of any current variant.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::InvalidErrorBlurring`] if the value is outside [0, 1].
    pub fn with_error_blurring(mut self, error_blurring: f32) -> Result<Self, BlurError> {
        if !(0.0..=1.0).contains(&error_blurring) {
            return Err(BlurError::InvalidErrorBlurring(error_blurring));
        }
        self.error_blurring = error_blurring;
        Ok(self)
    }

    /// The preset table.
    pub fn std_devs(&self) -> &StdDevTable {
        &self.std_devs
    }

    /// The standard deviation for `width`, honouring overrides.
    pub fn std_dev(&self, width: usize) -> Option<f32> {
        self.std_devs.std_dev(width)
    }

    /// The error function precision.
    pub fn erf_mode(&self) -> ErfMode {
        self.erf_mode
    }

    /// How kernels are normalized.
    pub fn weight_sum(&self) -> WeightSumMode {
        self.weight_sum
    }

    /// The shared-sample error blurring weight.
    ///
    /// Reserved for shared-sample blurs. None of the current blur variants read it.
    pub fn error_blurring(&self) -> f32 {
        self.error_blurring
    }
}

/// Check that a standard deviation is finite and positive.
pub(crate) fn validate_std_dev(sigma: f32) -> Result<(), BlurError> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(BlurError::InvalidStdDev(sigma))
    }
}

fn preset_index(width: usize) -> Option<usize> {
    PRESET_WIDTHS.iter().position(|&w| w == width)
}
