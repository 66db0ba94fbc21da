use crate::config::{validate_std_dev, BlurConfig};
use crate::error::BlurError;
use crate::kernels::GaussianKernel1d;
use crate::one_pass::{blur3x3_resize, blur_nxn, ONE_PASS_WIDTHS};
use crate::sampler::Fetch;
use crate::separable::{blur_fast, blur_resize};
use crate::taps::{compress_kernel, CompressedKernel};

/// The blur variant families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlurVariant {
    /// Separable 1D blur, one fetch per tap, any scale.
    Resize,
    /// Separable 1D blur, two taps per bilinear fetch, 1x only.
    Fast,
    /// One-pass 2D blur from compressed taps, 1x only, up to 9x9.
    OnePass,
    /// One-pass 3x3 blur, one fetch per tap, any scale.
    OnePassResize,
}

impl std::fmt::Display for BlurVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            BlurVariant::Resize => "resize",
            BlurVariant::Fast => "fast",
            BlurVariant::OnePass => "one-pass",
            BlurVariant::OnePassResize => "one-pass resize",
        };
        write!(f, "{name}")
    }
}

impl BlurVariant {
    /// Whether the variant can be built with `taps` taps.
    pub fn supports_width(&self, taps: usize) -> bool {
        match self {
            BlurVariant::Resize | BlurVariant::Fast => taps % 2 == 1,
            BlurVariant::OnePass => ONE_PASS_WIDTHS.contains(&taps),
            BlurVariant::OnePassResize => taps == 3,
        }
    }

    /// Whether the variant stays correct when output and input sizes differ.
    pub fn supports_resize(&self) -> bool {
        matches!(self, BlurVariant::Resize | BlurVariant::OnePassResize)
    }

    /// Whether the variant relies on bilinear filtering of its source.
    pub fn requires_bilinear(&self) -> bool {
        matches!(self, BlurVariant::Fast | BlurVariant::OnePass)
    }

    /// Whether the variant filters both axes in one pass.
    pub fn is_two_dimensional(&self) -> bool {
        matches!(self, BlurVariant::OnePass | BlurVariant::OnePassResize)
    }

    /// Fetches per output pixel for `taps` taps.
    pub fn fetches(&self, taps: usize) -> usize {
        let compressed = taps.div_ceil(2);
        match self {
            BlurVariant::Resize => taps,
            BlurVariant::Fast => compressed,
            BlurVariant::OnePass => compressed * compressed,
            BlurVariant::OnePassResize => taps * taps,
        }
    }
}

/// A blur operator with its kernel resolved and cached.
///
/// Built once per (variant, width, sigma) and then evaluated per output pixel by
/// [`Blur::sample`].
///
/// # Examples
///
/// ```
/// use royale_blur::{Blur, BlurConfig, BlurVariant};
/// use royale_blur::texture::{FilterMode, Texture};
/// use royale_image::Image;
///
/// let image = Image::<f32, 3>::from_size_val([16, 16].into(), 0.25).unwrap();
/// let texture = Texture::new(image, FilterMode::Bilinear).unwrap();
///
/// let blur = Blur::new(BlurVariant::Fast, 9, &BlurConfig::default()).unwrap();
/// let out = blur.sample(&texture, [0.5, 0.5], [1.0 / 16.0, 0.0]);
///
/// assert!((out[0] - 0.25).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Blur {
    variant: BlurVariant,
    kernel: GaussianKernel1d,
    compressed: CompressedKernel,
}

impl Blur {
    /// Create a blur using the configured standard deviation for its width.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::UnsupportedWidth`] if the variant cannot use `taps` taps,
    /// or [`BlurError::NoPresetStdDev`] if the width has no preset.
    pub fn new(variant: BlurVariant, taps: usize, config: &BlurConfig) -> Result<Self, BlurError> {
        check_width(variant, taps)?;
        let sigma = config
            .std_dev(taps)
            .ok_or(BlurError::NoPresetStdDev(taps))?;
        Self::with_std_dev(variant, taps, sigma, config)
    }

    /// Create a blur with an explicit standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::UnsupportedWidth`] if the variant cannot use `taps` taps,
    /// or [`BlurError::InvalidStdDev`] if `sigma` is not finite and positive.
    pub fn with_std_dev(
        variant: BlurVariant,
        taps: usize,
        sigma: f32,
        config: &BlurConfig,
    ) -> Result<Self, BlurError> {
        check_width(variant, taps)?;
        validate_std_dev(sigma)?;

        let kernel = GaussianKernel1d::new(taps, sigma, config.weight_sum(), config.erf_mode());
        let compressed = compress_kernel(&kernel);
        log::debug!(
            "{variant} blur: {taps} taps, sigma {sigma}, {} fetches, weight sum inverse {}",
            variant.fetches(taps),
            kernel.weight_sum_inv()
        );

        Ok(Self {
            variant,
            kernel,
            compressed,
        })
    }

    /// The variant.
    pub fn variant(&self) -> BlurVariant {
        self.variant
    }

    /// Number of taps per axis.
    pub fn taps(&self) -> usize {
        self.kernel.taps()
    }

    /// The standard deviation.
    pub fn sigma(&self) -> f32 {
        self.kernel.sigma()
    }

    /// The cached 1D kernel.
    pub fn kernel(&self) -> &GaussianKernel1d {
        &self.kernel
    }

    /// The cached compressed kernel.
    pub fn compressed_kernel(&self) -> &CompressedKernel {
        &self.compressed
    }

    /// Fetches per output pixel.
    pub fn fetches(&self) -> usize {
        self.variant.fetches(self.taps())
    }

    /// Filter one output pixel.
    ///
    /// # Arguments
    ///
    /// * `src` - The sample source, typically a [`crate::sampler::LinearizingSampler`].
    /// * `uv` - The normalized coordinate of the output pixel centre.
    /// * `stride` - One output pixel in source coordinates; zero one axis for the
    ///   separable variants.
    pub fn sample<const C: usize, S: Fetch<C> + ?Sized>(
        &self,
        src: &S,
        uv: [f32; 2],
        stride: [f32; 2],
    ) -> [f32; C] {
        match self.variant {
            BlurVariant::Resize => blur_resize(src, uv, stride, &self.kernel),
            BlurVariant::Fast => blur_fast(src, uv, stride, &self.compressed),
            BlurVariant::OnePass => blur_nxn(src, uv, stride, &self.compressed),
            BlurVariant::OnePassResize => blur3x3_resize(src, uv, stride, self.kernel.sigma()),
        }
    }
}

fn check_width(variant: BlurVariant, taps: usize) -> Result<(), BlurError> {
    if variant.supports_width(taps) {
        Ok(())
    } else {
        Err(BlurError::UnsupportedWidth { variant, taps })
    }
}
