use royale_image::ImageSize;

use crate::gamma::GammaGateway;

/// A color source addressed by normalized coordinates.
///
/// Every blur operator reads its input exclusively through this trait.
pub trait Fetch<const C: usize> {
    /// Sample the source at `uv`, with `(0, 0)` the top-left corner and `(1, 1)`
    /// the bottom-right corner.
    fn fetch(&self, uv: [f32; 2]) -> [f32; C];
}

impl<const C: usize, S: Fetch<C> + ?Sized> Fetch<C> for &S {
    fn fetch(&self, uv: [f32; 2]) -> [f32; C] {
        (**self).fetch(uv)
    }
}

/// Wraps a source so every fetch is linearized by a [`GammaGateway`].
///
/// # Examples
///
/// ```
/// use royale_blur::gamma::{GammaGateway, GammaSettings, GammaStage};
/// use royale_blur::sampler::{Fetch, LinearizingSampler};
/// use royale_blur::texture::{FilterMode, Texture};
/// use royale_image::Image;
///
/// let image = Image::<f32, 1>::from_size_val([2, 2].into(), 0.5).unwrap();
/// let texture = Texture::new(image, FilterMode::Bilinear).unwrap();
/// let gateway = GammaGateway::new(GammaStage::only_pass(), GammaSettings::default());
/// let sampler = LinearizingSampler::new(&texture, gateway);
///
/// assert!((sampler.fetch([0.5, 0.5])[0] - 0.5f32.powf(2.2)).abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct LinearizingSampler<'a, S: ?Sized> {
    source: &'a S,
    gateway: GammaGateway,
}

impl<'a, S: ?Sized> LinearizingSampler<'a, S> {
    /// Wrap a source.
    pub fn new(source: &'a S, gateway: GammaGateway) -> Self {
        Self { source, gateway }
    }

    /// The gateway applied to every fetch.
    pub fn gateway(&self) -> GammaGateway {
        self.gateway
    }
}

impl<const C: usize, S: Fetch<C> + ?Sized> Fetch<C> for LinearizingSampler<'_, S> {
    fn fetch(&self, uv: [f32; 2]) -> [f32; C] {
        self.gateway.decode_input(self.source.fetch(uv))
    }
}

/// Which axes a stride vector spans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrideAxis {
    /// Horizontal pass of a separable blur.
    Horizontal,
    /// Vertical pass of a separable blur.
    Vertical,
    /// Both axes, for one-pass 2D blurs.
    #[default]
    Both,
}

/// One output pixel's footprint in the source's normalized coordinates,
/// `(input / output) / texture` per axis, with the unused axis zeroed.
///
/// # Arguments
///
/// * `input` - Resolution of the pass input.
/// * `output` - Resolution of the pass output.
/// * `texture` - Resolution of the texture holding the input.
/// * `axis` - Which axes to keep.
pub fn stride_for(
    input: ImageSize,
    output: ImageSize,
    texture: ImageSize,
    axis: StrideAxis,
) -> [f32; 2] {
    let dx = (input.width as f32 / output.width as f32) / texture.width as f32;
    let dy = (input.height as f32 / output.height as f32) / texture.height as f32;
    match axis {
        StrideAxis::Horizontal => [dx, 0.0],
        StrideAxis::Vertical => [0.0, dy],
        StrideAxis::Both => [dx, dy],
    }
}

#[inline]
pub(crate) fn offset_uv(uv: [f32; 2], stride: [f32; 2], ox: f32, oy: f32) -> [f32; 2] {
    [uv[0] + ox * stride[0], uv[1] + oy * stride[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant([f32; 3]);

    impl Fetch<3> for Constant {
        fn fetch(&self, _uv: [f32; 2]) -> [f32; 3] {
            self.0
        }
    }

    #[test]
    fn strides() {
        let input: ImageSize = [64, 32].into();
        assert_eq!(
            stride_for(input, input, input, StrideAxis::Both),
            [1.0 / 64.0, 1.0 / 32.0]
        );
        assert_eq!(
            stride_for(input, [32, 16].into(), input, StrideAxis::Horizontal),
            [2.0 / 64.0, 0.0]
        );
        assert_eq!(
            stride_for(input, [32, 16].into(), [128, 64].into(), StrideAxis::Vertical),
            [0.0, 2.0 / 64.0]
        );
    }

    #[test]
    fn linearizing_sampler() {
        use crate::gamma::{GammaSettings, GammaStage};

        let source = Constant([0.25, 0.5, 1.0]);
        let gateway = GammaGateway::new(GammaStage::only_pass(), GammaSettings::default());
        let sampler = LinearizingSampler::new(&source, gateway);
        assert_eq!(sampler.fetch([0.0, 0.0]), gateway.decode_input([0.25, 0.5, 1.0]));

        let raw = LinearizingSampler::new(&source, GammaGateway::passthrough());
        assert_eq!(raw.fetch([0.3, 0.3]), [0.25, 0.5, 1.0]);
    }

    #[test]
    fn offsets() {
        assert_eq!(offset_uv([0.5, 0.5], [0.25, 0.0], -2.0, 3.0), [0.0, 0.5]);
    }
}
