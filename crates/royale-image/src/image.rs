use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use royale_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by this size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with interleaved pixel data.
///
/// The pixel data is stored row-major with shape (H, W, C), where H is the height
/// of the image, W the width and C the number of channels.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const C: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const C: usize> Image<T, C> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The interleaved pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use royale_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if data.len() != size.area() * C {
            return Err(ImageError::InvalidChannelShape(data.len(), size.area() * C));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with every channel of every pixel set to `val`.
    ///
    /// # Examples
    ///
    /// ```
    /// use royale_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 3>::from_size_val([4, 2].into(), 0.5).unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 4 * 2 * 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Image::new(size, vec![val; size.area() * C])
    }

    /// Create a new image by evaluating `f(x, y)` for every pixel.
    ///
    /// # Examples
    ///
    /// ```
    /// use royale_image::Image;
    ///
    /// let ramp = Image::<f32, 1>::from_fn([3, 1].into(), |x, _| [x as f32]).unwrap();
    ///
    /// assert_eq!(ramp.as_slice(), &[0.0, 1.0, 2.0]);
    /// ```
    pub fn from_fn(
        size: ImageSize,
        mut f: impl FnMut(usize, usize) -> [T; C],
    ) -> Result<Self, ImageError> {
        let mut data = Vec::with_capacity(size.area() * C);
        for y in 0..size.height {
            for x in 0..size.width {
                data.extend(f(x, y));
            }
        }
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the interleaved pixel data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the interleaved pixel data mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] when the coordinate lies outside the image.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<[T; C], ImageError>
    where
        T: Copy,
    {
        let base = self.pixel_offset(x, y)?;
        Ok(std::array::from_fn(|ch| self.data[base + ch]))
    }

    /// Get the pixel at `(x, y)` with both coordinates clamped to the image bounds.
    ///
    /// PRECONDITION: the image must not be empty.
    pub fn get_pixel_clamped(&self, x: isize, y: isize) -> [T; C]
    where
        T: Copy,
    {
        let x = x.clamp(0, self.width() as isize - 1) as usize;
        let y = y.clamp(0, self.height() as isize - 1) as usize;
        let base = (y * self.width() + x) * C;
        std::array::from_fn(|ch| self.data[base + ch])
    }

    fn pixel_offset(&self, x: usize, y: usize) -> Result<usize, ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        Ok((y * self.width() + x) * C)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(image_size.area(), 200);
        assert!(!image_size.is_empty());
        assert!(ImageSize::from([0, 3]).is_empty());
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([10, 20].into(), vec![0u8; 10 * 20 * 3])?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.as_slice().len(), 10 * 20 * 3);
        Ok(())
    }

    #[test]
    fn image_wrong_length() {
        let res = Image::<f32, 3>::new([2, 2].into(), vec![0.0; 11]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(11, 12)));
    }

    #[test]
    fn image_pixels() -> Result<(), ImageError> {
        let image = Image::<f32, 2>::from_fn([3, 2].into(), |x, y| {
            [x as f32, y as f32]
        })?;
        assert_eq!(image.get_pixel(2, 1)?, [2.0, 1.0]);
        assert_eq!(image.get_pixel(0, 1)?, [0.0, 1.0]);

        assert_eq!(
            image.get_pixel(3, 0),
            Err(ImageError::PixelIndexOutOfBounds(3, 0, 3, 2))
        );
        Ok(())
    }

    #[test]
    fn image_clamped_pixels() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([3, 1].into(), vec![1, 2, 3])?;
        assert_eq!(image.get_pixel_clamped(-4, 0), [1]);
        assert_eq!(image.get_pixel_clamped(1, 9), [2]);
        assert_eq!(image.get_pixel_clamped(12, -1), [3]);
        Ok(())
    }
}
