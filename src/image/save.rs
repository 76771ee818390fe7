//! Tensor preview saving.

use std::path::Path;

use image::{Rgb, RgbImage};
use ndarray::{ArrayBase, ArrayView3, Axis, Data, Ix4};

use crate::error::{Error, Result};
use crate::tensor::{GRAYSCALE_CHANNELS, RGB_CHANNELS};

/// Save one batch entry of an observation tensor as an image file.
///
/// The entry is:
/// 1. Flipped back so the image's top row comes first
/// 2. Denormalized from [0, 1] to [0, 255]
/// 3. Expanded to RGB if it has a single channel
/// 4. Saved to the specified path (format inferred from extension)
///
/// # Arguments
///
/// * `tensor` - NHWC tensor with values in [0, 1]
/// * `batch_index` - Batch entry to save
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an error if the entry does not exist, the channel count is not 1 or
/// 3, or the image cannot be saved.
pub fn save_tensor_image<S, P>(tensor: &ArrayBase<S, Ix4>, batch_index: usize, path: P) -> Result<()>
where
    S: Data<Elem = f32>,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let batch = tensor.len_of(Axis(0));
    if batch_index >= batch {
        return Err(Error::BatchIndexOutOfRange {
            index: batch_index,
            batch,
        });
    }

    let img = tensor_to_image(tensor.index_axis(Axis(0), batch_index))?;

    img.save(path).map_err(|source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Saved batch entry {batch_index} to {}", path.display());

    Ok(())
}

/// Convert one HWC entry back to an RGB image.
fn tensor_to_image(entry: ArrayView3<'_, f32>) -> Result<RgbImage> {
    let (height, width, channels) = entry.dim();

    if channels != RGB_CHANNELS && channels != GRAYSCALE_CHANNELS {
        return Err(Error::ShapeMismatch {
            expected: format!("{GRAYSCALE_CHANNELS} or {RGB_CHANNELS} channels"),
            actual: format!("{channels} channels"),
        });
    }

    let to_u32 = |value: usize| {
        u32::try_from(value).map_err(|_| Error::ShapeMismatch {
            expected: "dimensions within u32".to_string(),
            actual: format!("{width}x{height}"),
        })
    };
    let mut img = RgbImage::new(to_u32(width)?, to_u32(height)?);

    for (y, row) in entry.outer_iter().enumerate() {
        // Tensor row 0 holds the bottom of the image
        let target_row = to_u32(height - 1 - y)?;
        for (x, pixel) in row.outer_iter().enumerate() {
            let rgb = if channels == RGB_CHANNELS {
                [denormalize(pixel[0]), denormalize(pixel[1]), denormalize(pixel[2])]
            } else {
                [denormalize(pixel[0]); 3]
            };
            img.put_pixel(to_u32(x)?, target_row, Rgb(rgb));
        }
    }

    Ok(img)
}

/// Denormalize a value from [0, 1] to [0, 255] with clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn denormalize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
