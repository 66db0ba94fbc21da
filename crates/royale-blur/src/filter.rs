use royale_image::{Image, ImageError, ImageSize};

use crate::blur::Blur;
use crate::error::BlurError;
use crate::gamma::{GammaGateway, GammaSettings, GammaStage};
use crate::parallel::{for_each_row, ExecutionStrategy};
use crate::sampler::{stride_for, LinearizingSampler, StrideAxis};
use crate::texture::{FilterMode, Texture};

/// Run one blur pass over every pixel of `dst`.
///
/// Each output pixel is sampled at its centre with the stride implied by the source
/// and destination sizes. Fetches are linearized by `gateway`; the output is left in
/// linear light, see [`encode_image`]. When the source has a mip chain and the pass
/// minifies, the level matching the scale along `axis` is sampled. A pass over both
/// axes uses the less minified one.
///
/// # Arguments
///
/// * `src` - The source texture.
/// * `dst` - The destination image. May differ in size from `src` for resize variants.
/// * `blur` - The blur operator.
/// * `gateway` - Gamma decoding for this pass.
/// * `axis` - Which axes the stride spans.
/// * `strategy` - How rows are distributed.
///
/// # Errors
///
/// Returns [`ImageError::EmptyImage`] if `dst` has no pixels.
pub fn blur_image<const C: usize>(
    src: &Texture<C>,
    dst: &mut Image<f32, C>,
    blur: &Blur,
    gateway: GammaGateway,
    axis: StrideAxis,
    strategy: ExecutionStrategy,
) -> Result<(), BlurError> {
    let dst_size = dst.size();
    if dst_size.is_empty() {
        return Err(ImageError::EmptyImage(dst_size.width, dst_size.height).into());
    }

    let variant = blur.variant();
    if variant.requires_bilinear() && src.filter_mode() == FilterMode::Nearest {
        log::warn!("{variant} blur sampling a nearest-filtered texture, taps will not merge");
    }
    if src.size() != dst_size && !variant.supports_resize() {
        log::warn!(
            "{variant} blur resizing {} to {}, only 1x scale is supported",
            src.size(),
            dst_size
        );
    }

    let stride = stride_for(src.size(), dst_size, src.size(), axis);
    let level = if variant.supports_resize() {
        src.level_for_scale(axis_scale(src.size(), dst_size, axis))
    } else {
        0
    };
    let view = src.view(level);
    let sampler = LinearizingSampler::new(&view, gateway);

    let (cols, rows) = (dst_size.width as f32, dst_size.height as f32);
    for_each_row(dst.as_slice_mut(), C * dst_size.width, strategy, |y, row| {
        let v = (y as f32 + 0.5) / rows;
        row.chunks_exact_mut(C).enumerate().for_each(|(x, pixel)| {
            let u = (x as f32 + 0.5) / cols;
            pixel.copy_from_slice(&blur.sample(&sampler, [u, v], stride));
        });
    })
}

/// Gamma-encode every pixel of an image in place, if the gateway's stage encodes.
pub fn encode_image<const C: usize>(
    image: &mut Image<f32, C>,
    gateway: GammaGateway,
    strategy: ExecutionStrategy,
) -> Result<(), BlurError> {
    if !gateway.stage().gamma_encode_output() || image.size().is_empty() {
        return Ok(());
    }
    let row_len = C * image.width();
    for_each_row(image.as_slice_mut(), row_len, strategy, |_, row| {
        row.chunks_exact_mut(C).for_each(|pixel| {
            let mut color = [0.0f32; C];
            color.copy_from_slice(pixel);
            pixel.copy_from_slice(&gateway.encode_output(color));
        });
    })
}

/// Blur a texture into an image, gamma-correctly.
///
/// Separable variants run a horizontal pass into an intermediate image followed by a
/// vertical pass; one-pass variants run once. The intermediate is gamma-encoded only
/// when `stage.encode_every_stage` is set. The result is encoded with the output gamma
/// when `stage` is the last pass.
///
/// # Arguments
///
/// * `src` - The source texture.
/// * `dst` - The destination image.
/// * `blur` - The blur operator.
/// * `stage` - Where this blur sits in the caller's pipeline.
/// * `settings` - Gamma exponents.
/// * `strategy` - How rows are distributed.
///
/// # Examples
///
/// ```
/// use royale_blur::filter::gaussian_blur;
/// use royale_blur::gamma::{GammaSettings, GammaStage};
/// use royale_blur::parallel::ExecutionStrategy;
/// use royale_blur::texture::{FilterMode, Texture};
/// use royale_blur::{Blur, BlurConfig, BlurVariant};
/// use royale_image::Image;
///
/// let image = Image::<f32, 3>::from_size_val([32, 32].into(), 0.5).unwrap();
/// let texture = Texture::new(image, FilterMode::Bilinear).unwrap();
/// let mut dst = Image::<f32, 3>::from_size_val([32, 32].into(), 0.0).unwrap();
///
/// let blur = Blur::new(BlurVariant::Fast, 9, &BlurConfig::default()).unwrap();
/// gaussian_blur(
///     &texture,
///     &mut dst,
///     &blur,
///     GammaStage::only_pass(),
///     GammaSettings::default(),
///     ExecutionStrategy::Serial,
/// )
/// .unwrap();
///
/// assert!((dst.get_pixel(10, 10).unwrap()[1] - 0.5).abs() < 1e-4);
/// ```
pub fn gaussian_blur<const C: usize>(
    src: &Texture<C>,
    dst: &mut Image<f32, C>,
    blur: &Blur,
    stage: GammaStage,
    settings: GammaSettings,
    strategy: ExecutionStrategy,
) -> Result<(), BlurError> {
    if blur.variant().is_two_dimensional() {
        let gateway = GammaGateway::new(stage, settings);
        blur_image(src, dst, blur, gateway, StrideAxis::Both, strategy)?;
        return encode_image(dst, gateway, strategy);
    }

    let horizontal = GammaGateway::new(
        GammaStage {
            last_pass: false,
            ..stage
        },
        settings,
    );
    let vertical = GammaGateway::new(
        GammaStage {
            first_pass: false,
            ..stage
        },
        settings,
    );

    let mid_size = ImageSize {
        width: dst.width(),
        height: src.size().height,
    };
    let mut mid = Image::from_size_val(mid_size, 0.0)?;
    blur_image(src, &mut mid, blur, horizontal, StrideAxis::Horizontal, strategy)?;
    encode_image(&mut mid, horizontal, strategy)?;

    let mid = if src.num_levels() > 1 {
        Texture::with_mipmaps(mid, src.filter_mode())?
    } else {
        Texture::new(mid, src.filter_mode())?
    };
    blur_image(&mid, dst, blur, vertical, StrideAxis::Vertical, strategy)?;
    encode_image(dst, vertical, strategy)
}

// Input texels per output pixel along the stride axis.
fn axis_scale(src: ImageSize, dst: ImageSize, axis: StrideAxis) -> f32 {
    let sx = src.width as f32 / dst.width as f32;
    let sy = src.height as f32 / dst.height as f32;
    match axis {
        StrideAxis::Horizontal => sx,
        StrideAxis::Vertical => sy,
        StrideAxis::Both => sx.min(sy),
    }
}
