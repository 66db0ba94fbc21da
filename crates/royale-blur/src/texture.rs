use rayon::prelude::*;
use royale_image::{Image, ImageError, ImageSize};

use crate::sampler::Fetch;

/// How a texture reconstructs values between texel centres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterMode {
    /// Return the texel containing the coordinate.
    Nearest,
    /// Interpolate the four nearest texel centres.
    #[default]
    Bilinear,
}

/// An image addressed by normalized coordinates, with an optional mip chain.
///
/// Texel `i` has its centre at `(i + 0.5) / size`; coordinates outside `[0, 1]`
/// clamp to the edge texels. Level 0 is the full-resolution image and each further
/// level halves both dimensions, down to 1x1.
#[derive(Clone, Debug)]
pub struct Texture<const C: usize> {
    levels: Vec<Image<f32, C>>,
    filter: FilterMode,
}

impl<const C: usize> Texture<C> {
    /// Create a texture without mipmaps.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::EmptyImage`] if the image has no pixels.
    pub fn new(image: Image<f32, C>, filter: FilterMode) -> Result<Self, ImageError> {
        if image.size().is_empty() {
            return Err(ImageError::EmptyImage(image.width(), image.height()));
        }
        Ok(Self {
            levels: vec![image],
            filter,
        })
    }

    /// Create a texture and build its full mip chain by 2x2 box downsampling.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::EmptyImage`] if the image has no pixels.
    pub fn with_mipmaps(image: Image<f32, C>, filter: FilterMode) -> Result<Self, ImageError> {
        let mut texture = Self::new(image, filter)?;
        while let Some(next) = texture.next_mip_size() {
            let level = downsample_box(&texture.levels[texture.levels.len() - 1], next)?;
            texture.levels.push(level);
        }
        log::debug!(
            "built {} mip levels for a {} texture",
            texture.levels.len(),
            texture.size()
        );
        Ok(texture)
    }

    /// Size of the full-resolution level.
    pub fn size(&self) -> ImageSize {
        self.levels[0].size()
    }

    /// The filter mode used for every fetch.
    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    /// Number of levels, 1 when no mip chain was built.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// The image backing a level.
    pub fn level(&self, level: usize) -> Option<&Image<f32, C>> {
        self.levels.get(level)
    }

    /// The level to sample when minifying by `scale` (input texels per output pixel),
    /// clamped to the available levels.
    pub fn level_for_scale(&self, scale: f32) -> usize {
        if scale.is_nan() || scale <= 1.0 {
            return 0;
        }
        let level = scale.log2().floor() as usize;
        level.min(self.levels.len() - 1)
    }

    /// A view that samples one level. Out-of-range levels clamp to the smallest one.
    pub fn view(&self, level: usize) -> TextureLevel<'_, C> {
        TextureLevel {
            image: &self.levels[level.min(self.levels.len() - 1)],
            filter: self.filter,
        }
    }

    fn next_mip_size(&self) -> Option<ImageSize> {
        let last = self.levels[self.levels.len() - 1].size();
        if last.width == 1 && last.height == 1 {
            return None;
        }
        Some(ImageSize {
            width: (last.width / 2).max(1),
            height: (last.height / 2).max(1),
        })
    }
}

impl<const C: usize> Fetch<C> for Texture<C> {
    fn fetch(&self, uv: [f32; 2]) -> [f32; C] {
        sample_image(&self.levels[0], self.filter, uv)
    }
}

/// One level of a [`Texture`], sampled with the texture's filter mode.
#[derive(Clone, Copy, Debug)]
pub struct TextureLevel<'a, const C: usize> {
    image: &'a Image<f32, C>,
    filter: FilterMode,
}

impl<const C: usize> TextureLevel<'_, C> {
    /// Size of this level.
    pub fn size(&self) -> ImageSize {
        self.image.size()
    }
}

impl<const C: usize> Fetch<C> for TextureLevel<'_, C> {
    fn fetch(&self, uv: [f32; 2]) -> [f32; C] {
        sample_image(self.image, self.filter, uv)
    }
}

fn sample_image<const C: usize>(image: &Image<f32, C>, filter: FilterMode, uv: [f32; 2]) -> [f32; C] {
    let (w, h) = (image.width() as f32, image.height() as f32);
    match filter {
        FilterMode::Nearest => {
            image.get_pixel_clamped((uv[0] * w).floor() as isize, (uv[1] * h).floor() as isize)
        }
        FilterMode::Bilinear => bilinear_interpolation(image, uv[0] * w - 0.5, uv[1] * h - 0.5),
    }
}

// `x` and `y` are in texel units, relative to texel centres.
fn bilinear_interpolation<const C: usize>(image: &Image<f32, C>, x: f32, y: f32) -> [f32; C] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (ix, iy) = (x0 as isize, y0 as isize);

    let p00 = image.get_pixel_clamped(ix, iy);
    let p01 = image.get_pixel_clamped(ix + 1, iy);
    let p10 = image.get_pixel_clamped(ix, iy + 1);
    let p11 = image.get_pixel_clamped(ix + 1, iy + 1);

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w01 = fx * (1.0 - fy);
    let w10 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    std::array::from_fn(|k| p00[k] * w00 + p01[k] * w01 + p10[k] * w10 + p11[k] * w11)
}

fn downsample_box<const C: usize>(
    src: &Image<f32, C>,
    size: ImageSize,
) -> Result<Image<f32, C>, ImageError> {
    let mut dst = Image::from_size_val(size, 0.0)?;
    let cols = size.width;

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(y, row)| {
            let (sy0, sy1) = (2 * y as isize, 2 * y as isize + 1);
            row.chunks_exact_mut(C).enumerate().for_each(|(x, pixel)| {
                let (sx0, sx1) = (2 * x as isize, 2 * x as isize + 1);
                let quad = [
                    src.get_pixel_clamped(sx0, sy0),
                    src.get_pixel_clamped(sx1, sy0),
                    src.get_pixel_clamped(sx0, sy1),
                    src.get_pixel_clamped(sx1, sy1),
                ];
                for (k, out) in pixel.iter_mut().enumerate() {
                    *out = 0.25 * quad.iter().map(|p| p[k]).sum::<f32>();
                }
            });
        });

    Ok(dst)
}
