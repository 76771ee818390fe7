//! Image loading utilities.

use std::path::Path;

use image::{imageops::FilterType, GenericImageView, RgbImage};

use crate::error::{Error, Result};

/// Load an image from disk as 8-bit RGB.
///
/// The image is:
/// 1. Loaded from the specified path
/// 2. Resized to `resize` if given (triangle filter)
/// 3. Converted to RGB if necessary
///
/// # Errors
///
/// Returns an error if the image cannot be loaded.
pub fn load_image<P: AsRef<Path>>(path: P, resize: Option<(u32, u32)>) -> Result<RgbImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = img.dimensions();
    tracing::debug!("Loaded {} ({width}x{height})", path.display());

    let img = match resize {
        Some((w, h)) if (w, h) != (width, height) => img.resize_exact(w, h, FilterType::Triangle),
        _ => img,
    };

    Ok(img.to_rgb8())
}

/// Load several images, in order.
///
/// # Errors
///
/// Returns the first load error encountered.
pub fn load_batch<P: AsRef<Path>>(paths: &[P], resize: Option<(u32, u32)>) -> Result<Vec<RgbImage>> {
    paths.iter().map(|path| load_image(path, resize)).collect()
}
