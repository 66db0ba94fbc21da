/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match width * height * channels.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when an image with zero width or height is used as a sample source.
    #[error("Image has an empty size ({0}, {1})")]
    EmptyImage(usize, usize),

    /// Error when a pixel coordinate lies outside the image.
    #[error("Pixel ({0}, {1}) is out of bounds for an image of size ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),
}
