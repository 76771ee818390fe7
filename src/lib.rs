//! # `pixel-tensor`
//!
//! Observation preprocessing for inference engines.
//!
//! Two stateless operations live here:
//!
//! - [`pixels_to_tensor`] writes a batch of RGB images into a caller-owned
//!   NHWC `f32` tensor. Rows are flipped vertically so that tensor row 0 is
//!   the bottom of the image, and every channel is normalized to `[0, 1]`.
//!   In grayscale mode the three channels collapse to their plain average.
//! - [`prefix_sum`] turns a list of segment sizes (for example the number of
//!   actions in each discrete branch) into offset boundaries.
//!
//! ## Example
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use ndarray::Array4;
//! use pixel_tensor::{pixels_to_tensor, prefix_sum};
//!
//! # fn main() -> pixel_tensor::Result<()> {
//! let images = vec![RgbImage::from_pixel(4, 2, Rgb([255, 0, 0]))];
//! let mut tensor = Array4::<f32>::zeros((1, 2, 4, 3));
//!
//! pixels_to_tensor(&images, &mut tensor, false)?;
//! assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
//!
//! assert_eq!(prefix_sum(&[5, 3, 2]), vec![0, 5, 8, 10]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image;
pub mod tensor;

pub use error::{Error, Result};
pub use tensor::{
    pixels_to_new_tensor, pixels_to_tensor, pixels_to_tensor_at, prefix_sum, ConvertConfig,
};
