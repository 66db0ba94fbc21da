use royale_special::ErfMode;

use crate::config::WeightSumMode;
use crate::kernels::GaussianKernel1d;
use crate::sampler::{offset_uv, Fetch};
use crate::taps::{compress_kernel, CompressedKernel};

/// 1D Gaussian blur with one fetch per tap.
///
/// Works at any scale and with any filter mode, because each tap lands on the
/// stride grid instead of between texels.
///
/// # Arguments
///
/// * `src` - The sample source.
/// * `uv` - The normalized coordinate of the output pixel centre.
/// * `stride` - One output pixel in source coordinates, one axis zeroed.
/// * `kernel` - The kernel to apply.
pub fn blur_resize<const C: usize, S: Fetch<C> + ?Sized>(
    src: &S,
    uv: [f32; 2],
    stride: [f32; 2],
    kernel: &GaussianKernel1d,
) -> [f32; C] {
    let mut acc = [0.0f32; C];
    accumulate(&mut acc, src.fetch(uv), kernel.weight(0));
    for (k, &w) in kernel.weights().iter().enumerate().skip(1) {
        let k = k as f32;
        accumulate(&mut acc, src.fetch(offset_uv(uv, stride, k, k)), w);
        accumulate(&mut acc, src.fetch(offset_uv(uv, stride, -k, -k)), w);
    }
    scale(acc, kernel.weight_sum_inv())
}

/// 1D Gaussian blur with two taps per bilinear fetch.
///
/// PRECONDITION: the source filters bilinearly and `stride` is one texel.
///
/// # Arguments
///
/// * `src` - The sample source.
/// * `uv` - The normalized coordinate of the output pixel centre.
/// * `stride` - One texel in source coordinates, one axis zeroed.
/// * `taps` - The compressed kernel to apply.
pub fn blur_fast<const C: usize, S: Fetch<C> + ?Sized>(
    src: &S,
    uv: [f32; 2],
    stride: [f32; 2],
    taps: &CompressedKernel,
) -> [f32; C] {
    let mut acc = [0.0f32; C];
    for (i, tap) in taps.half_taps().iter().enumerate() {
        for &sign in taps.mirror_signs(i) {
            let o = sign * tap.offset;
            accumulate(&mut acc, src.fetch(offset_uv(uv, stride, o, o)), tap.weight);
        }
    }
    scale(acc, taps.weight_sum_inv())
}

#[inline]
pub(crate) fn accumulate<const C: usize>(acc: &mut [f32; C], sample: [f32; C], weight: f32) {
    for (a, s) in acc.iter_mut().zip(sample) {
        *a += s * weight;
    }
}

#[inline]
pub(crate) fn scale<const C: usize>(acc: [f32; C], factor: f32) -> [f32; C] {
    acc.map(|a| a * factor)
}

macro_rules! named_resize_blurs {
    ($($name:ident => $taps:expr),* $(,)?) => {
        $(
            #[doc = concat!(
                "[`blur_resize`] with ", stringify!($taps),
                " taps and an explicit standard deviation."
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
                blur_resize(src, uv, stride, &kernel)
            }
        )*
    };
}

macro_rules! named_fast_blurs {
    ($($name:ident => $taps:expr),* $(,)?) => {
        $(
            #[doc = concat!(
                "[`blur_fast`] with ", stringify!($taps),
                " taps and an explicit standard deviation."
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
                blur_fast(src, uv, stride, &compress_kernel(&kernel))
            }
        )*
    };
}

named_resize_blurs! {
    blur3_resize => 3,
    blur5_resize => 5,
    blur7_resize => 7,
    blur9_resize => 9,
    blur11_resize => 11,
}

named_fast_blurs! {
    blur3_fast => 3,
    blur5_fast => 5,
    blur7_fast => 7,
    blur9_fast => 9,
    blur11_fast => 11,
    blur17_fast => 17,
    blur25_fast => 25,
    blur31_fast => 31,
    blur43_fast => 43,
}
