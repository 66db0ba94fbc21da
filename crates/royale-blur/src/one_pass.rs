use royale_special::ErfMode;

use crate::config::WeightSumMode;
use crate::kernels::{gaussian_weight_2d, GaussianKernel1d};
use crate::sampler::{offset_uv, Fetch};
use crate::separable::{accumulate, scale};
use crate::taps::{compress_kernel, CompressedKernel};

/// Widths supported by the one-pass 2D blurs.
pub const ONE_PASS_WIDTHS: [usize; 4] = [3, 5, 7, 9];

/// One-pass 2D Gaussian blur from the outer product of a compressed 1D kernel.
///
/// The weights of one quadrant are computed once and reused for the three mirrored
/// quadrants, so an N-tap kernel costs `((N + 1) / 2)²` bilinear fetches.
///
/// PRECONDITION: the source filters bilinearly and `stride` is one texel on both axes.
///
/// # Arguments
///
/// * `src` - The sample source.
/// * `uv` - The normalized coordinate of the output pixel centre.
/// * `stride` - One texel in source coordinates.
/// * `taps` - The compressed kernel, applied on both axes.
pub fn blur_nxn<const C: usize, S: Fetch<C> + ?Sized>(
    src: &S,
    uv: [f32; 2],
    stride: [f32; 2],
    taps: &CompressedKernel,
) -> [f32; C] {
    let half = taps.half_taps();
    let mut acc = [0.0f32; C];
    for (j, tap_y) in half.iter().enumerate() {
        for (i, tap_x) in half.iter().enumerate() {
            let weight = tap_x.weight * tap_y.weight;
            for &sy in taps.mirror_signs(j) {
                for &sx in taps.mirror_signs(i) {
                    let at = offset_uv(uv, stride, sx * tap_x.offset, sy * tap_y.offset);
                    accumulate(&mut acc, src.fetch(at), weight);
                }
            }
        }
    }
    let inv = taps.weight_sum_inv();
    scale(acc, inv * inv)
}

/// One-pass 3x3 Gaussian blur with one fetch per tap, usable at any scale.
///
/// The centre has weight 1, the edges `exp(-1 / (2σ²))` and the corners
/// `exp(-2 / (2σ²))`.
///
/// # Arguments
///
/// * `src` - The sample source.
/// * `uv` - The normalized coordinate of the output pixel centre.
/// * `stride` - One output pixel in source coordinates.
/// * `sigma` - The standard deviation in output pixels.
pub fn blur3x3_resize<const C: usize, S: Fetch<C> + ?Sized>(
    src: &S,
    uv: [f32; 2],
    stride: [f32; 2],
    sigma: f32,
) -> [f32; C] {
    let edge = gaussian_weight_2d(1.0, 0.0, sigma);
    let corner = gaussian_weight_2d(1.0, 1.0, sigma);
    let mut acc = [0.0f32; C];
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let weight = match dx.abs() + dy.abs() {
                0 => 1.0,
                1 => edge,
                _ => corner,
            };
            let at = offset_uv(uv, stride, dx as f32, dy as f32);
            accumulate(&mut acc, src.fetch(at), weight);
        }
    }
    scale(acc, (1.0 + 4.0 * edge + 4.0 * corner).recip())
}

macro_rules! named_one_pass_blurs {
    ($($name:ident => $taps:expr),* $(,)?) => {
        $(
            #[doc = concat!(
                "[`blur_nxn`] over a ", stringify!($taps), "x", stringify!($taps),
                " footprint with an explicit standard deviation."
            )]
            pub fn $name<const C: usize, S: Fetch<C> + ?Sized>(
                src: &S,
                uv: [f32; 2],
                stride: [f32; 2],
                sigma: f32,
            ) -> [f32; C] {
                let kernel = GaussianKernel1d::new(
                    $taps,
                    sigma,
                    WeightSumMode::default(),
                    ErfMode::default(),
                );
                blur_nxn(src, uv, stride, &compress_kernel(&kernel))
            }
        )*
    };
}

named_one_pass_blurs! {
    blur3x3 => 3,
    blur5x5 => 5,
    blur7x7 => 7,
    blur9x9 => 9,
}
