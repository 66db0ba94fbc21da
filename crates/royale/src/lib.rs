#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use royale_image as image;

#[doc(inline)]
pub use royale_special as special;

#[doc(inline)]
pub use royale_blur as blur;
