//! Batch conversion of RGB images into NHWC tensors.

use image::{Rgb, RgbImage};
use ndarray::{Array4, ArrayBase, Axis, DataMut, Ix4};

use crate::error::{Error, Result};

use super::{channels_for, ObservationTensor};

/// Write a batch of images into a pre-allocated NHWC tensor.
///
/// For every image `b`, destination row `h` is read from source row
/// `height - 1 - h`, so row 0 of the tensor holds the bottom row of the image.
/// Color mode writes `r / 255`, `g / 255` and `b / 255` into channels 0..3.
/// Grayscale mode writes `(r + g + b) / 3 / 255` into channel 0.
///
/// # Arguments
///
/// * `images` - Batch of images sharing the same dimensions
/// * `tensor` - Tensor of shape `(images.len(), height, width, channels)`
/// * `grayscale` - Collapse the color channels into a single averaged channel
///
/// # Errors
///
/// Returns [`Error::EmptyBatch`], [`Error::InconsistentImageSize`] or
/// [`Error::ShapeMismatch`]. All checks run before the first write, so a
/// failed call leaves the tensor untouched.
pub fn pixels_to_tensor<S>(
    images: &[RgbImage],
    tensor: &mut ArrayBase<S, Ix4>,
    grayscale: bool,
) -> Result<()>
where
    S: DataMut<Elem = f32>,
{
    let (width, height) = batch_dimensions(images)?;
    let expected = [
        images.len(),
        height as usize,
        width as usize,
        channels_for(grayscale),
    ];
    check_shape(tensor.shape(), &expected)?;

    tracing::debug!(
        "Writing {} image(s) of {width}x{height} into tensor {expected:?} (grayscale: {grayscale})",
        images.len()
    );

    for (index, image) in images.iter().enumerate() {
        write_image(image, tensor, index, grayscale);
    }

    Ok(())
}

/// Write a single image into one batch slot of an existing tensor.
///
/// Uses the same flip and normalization as [`pixels_to_tensor`]. Other batch
/// slots are not touched.
///
/// # Errors
///
/// Returns [`Error::BatchIndexOutOfRange`] if `batch_index` is not a valid slot,
/// or [`Error::ShapeMismatch`] if the tensor's height, width or channel count
/// does not match the image and mode.
pub fn pixels_to_tensor_at<S>(
    image: &RgbImage,
    tensor: &mut ArrayBase<S, Ix4>,
    grayscale: bool,
    batch_index: usize,
) -> Result<()>
where
    S: DataMut<Elem = f32>,
{
    let (width, height) = image.dimensions();
    let batch = tensor.len_of(Axis(0));
    let expected = [batch, height as usize, width as usize, channels_for(grayscale)];
    check_shape(tensor.shape(), &expected)?;

    if batch_index >= batch {
        return Err(Error::BatchIndexOutOfRange {
            index: batch_index,
            batch,
        });
    }

    write_image(image, tensor, batch_index, grayscale);

    Ok(())
}

/// Allocate a tensor for the batch and fill it.
///
/// # Errors
///
/// Returns [`Error::EmptyBatch`] or [`Error::InconsistentImageSize`].
pub fn pixels_to_new_tensor(images: &[RgbImage], grayscale: bool) -> Result<ObservationTensor> {
    let (width, height) = batch_dimensions(images)?;
    let mut tensor = Array4::<f32>::zeros((
        images.len(),
        height as usize,
        width as usize,
        channels_for(grayscale),
    ));

    pixels_to_tensor(images, &mut tensor, grayscale)?;

    Ok(tensor)
}

/// Dimensions shared by every image of a non-empty batch.
fn batch_dimensions(images: &[RgbImage]) -> Result<(u32, u32)> {
    let first = images.first().ok_or(Error::EmptyBatch)?;
    let expected = first.dimensions();

    for (index, image) in images.iter().enumerate().skip(1) {
        let actual = image.dimensions();
        if actual != expected {
            return Err(Error::InconsistentImageSize {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(expected)
}

fn check_shape(actual: &[usize], expected: &[usize; 4]) -> Result<()> {
    if actual != expected {
        return Err(Error::ShapeMismatch {
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        });
    }
    Ok(())
}

/// Caller has validated the tensor shape against the image.
fn write_image<S>(image: &RgbImage, tensor: &mut ArrayBase<S, Ix4>, batch: usize, grayscale: bool)
where
    S: DataMut<Elem = f32>,
{
    let (width, height) = image.dimensions();
    let mut slot = tensor.index_axis_mut(Axis(0), batch);

    for h in 0..height {
        // Tensor row 0 is the bottom of the image
        let source_row = height - 1 - h;
        for w in 0..width {
            let Rgb([r, g, b]) = *image.get_pixel(w, source_row);
            let (y, x) = (h as usize, w as usize);

            if grayscale {
                slot[[y, x, 0]] = (f32::from(r) + f32::from(g) + f32::from(b)) / 3.0 / 255.0;
            } else {
                slot[[y, x, 0]] = f32::from(r) / 255.0;
                slot[[y, x, 1]] = f32::from(g) / 255.0;
                slot[[y, x, 2]] = f32::from(b) / 255.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    /// 2x2 image with a distinct color per pixel.
    fn quad() -> RgbImage {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(1, 0, Rgb([40, 50, 60]));
        img.put_pixel(0, 1, Rgb([70, 80, 90]));
        img.put_pixel(1, 1, Rgb([100, 110, 120]));
        img
    }

    #[test]
    fn test_single_red_pixel_color() {
        let images = vec![RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]))];
        let mut tensor = Array4::<f32>::zeros((1, 1, 1, 3));

        pixels_to_tensor(&images, &mut tensor, false).unwrap();

        assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_eq!(tensor[[0, 0, 0, 1]], 0.0);
        assert_eq!(tensor[[0, 0, 0, 2]], 0.0);
    }

    #[test]
    fn test_single_red_pixel_grayscale() {
        let images = vec![RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]))];
        let mut tensor = Array4::<f32>::zeros((1, 1, 1, 1));

        pixels_to_tensor(&images, &mut tensor, true).unwrap();

        assert!(approx_eq(tensor[[0, 0, 0, 0]], 1.0 / 3.0));
    }

    #[test]
    fn test_grayscale_is_unweighted_average() {
        // A luma formula would weight green far above blue
        let images = vec![
            RgbImage::from_pixel(1, 1, Rgb([0, 255, 0])),
            RgbImage::from_pixel(1, 1, Rgb([0, 0, 255])),
            RgbImage::from_pixel(1, 1, Rgb([255, 255, 255])),
            RgbImage::from_pixel(1, 1, Rgb([0, 0, 0])),
        ];
        let tensor = pixels_to_new_tensor(&images, true).unwrap();

        assert_eq!(tensor[[0, 0, 0, 0]], tensor[[1, 0, 0, 0]]);
        assert_eq!(tensor[[2, 0, 0, 0]], 1.0);
        assert_eq!(tensor[[3, 0, 0, 0]], 0.0);
    }

    #[test]
    fn test_vertical_flip() {
        let images = vec![quad()];
        let mut tensor = Array4::<f32>::zeros((1, 2, 2, 3));

        pixels_to_tensor(&images, &mut tensor, false).unwrap();

        // Top source row lands on the last tensor row
        assert!(approx_eq(tensor[[0, 1, 0, 0]], 10.0 / 255.0));
        assert!(approx_eq(tensor[[0, 1, 1, 0]], 40.0 / 255.0));
        // Bottom source row lands on tensor row 0
        assert!(approx_eq(tensor[[0, 0, 0, 0]], 70.0 / 255.0));
        assert!(approx_eq(tensor[[0, 0, 1, 2]], 120.0 / 255.0));
    }

    #[test]
    fn test_non_square_flip_keeps_columns() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 0, Rgb([255, 255, 255]));
        let tensor = pixels_to_new_tensor(&[img], true).unwrap();

        assert_eq!(tensor.shape(), &[1, 2, 3, 1]);
        assert_eq!(tensor[[0, 1, 2, 0]], 1.0);
        assert_eq!(tensor.sum(), 1.0);
    }

    #[test]
    fn test_batches_do_not_interfere() {
        let images = vec![
            RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])),
            RgbImage::from_pixel(2, 2, Rgb([0, 0, 255])),
        ];
        let tensor = pixels_to_new_tensor(&images, false).unwrap();

        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(tensor[[0, y, x, 0]], 1.0);
                assert_eq!(tensor[[0, y, x, 2]], 0.0);
                assert_eq!(tensor[[1, y, x, 0]], 0.0);
                assert_eq!(tensor[[1, y, x, 2]], 1.0);
            }
        }
    }

    #[test]
    fn test_normalization_range() {
        let mut img = RgbImage::new(16, 16);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let v = (x * 16 + y) as u8;
            *pixel = Rgb([v, 255 - v, v / 2]);
        }
        let tensor = pixels_to_new_tensor(&[img], false).unwrap();

        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_writes_into_view() {
        let images = vec![RgbImage::from_pixel(1, 1, Rgb([0, 255, 0]))];
        let mut storage = Array4::<f32>::zeros((1, 1, 1, 3));

        pixels_to_tensor(&images, &mut storage.view_mut(), false).unwrap();

        assert_eq!(storage[[0, 0, 0, 1]], 1.0);
    }

    #[test]
    fn test_empty_batch() {
        let mut tensor = Array4::<f32>::zeros((0, 1, 1, 3));
        let err = pixels_to_tensor(&[], &mut tensor, false).unwrap_err();

        assert!(matches!(err, Error::EmptyBatch));
        assert!(matches!(
            pixels_to_new_tensor(&[], true),
            Err(Error::EmptyBatch)
        ));
    }

    #[test]
    fn test_inconsistent_image_size() {
        let images = vec![
            RgbImage::new(2, 2),
            RgbImage::new(2, 2),
            RgbImage::new(3, 2),
        ];
        let mut tensor = Array4::<f32>::zeros((3, 2, 2, 3));

        let err = pixels_to_tensor(&images, &mut tensor, false).unwrap_err();

        assert!(matches!(
            err,
            Error::InconsistentImageSize {
                index: 2,
                expected: (2, 2),
                actual: (3, 2),
            }
        ));
    }

    #[test]
    fn test_channel_mode_mismatch() {
        let images = vec![RgbImage::new(2, 2)];
        let mut color = Array4::<f32>::zeros((1, 2, 2, 3));
        let mut gray = Array4::<f32>::zeros((1, 2, 2, 1));

        assert!(matches!(
            pixels_to_tensor(&images, &mut color, true),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            pixels_to_tensor(&images, &mut gray, false),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_failed_call_leaves_tensor_untouched() {
        let images = vec![RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]))];
        // Wrong batch size
        let mut tensor = Array4::<f32>::from_elem((2, 2, 2, 3), -1.0);

        let err = pixels_to_tensor(&images, &mut tensor, false).unwrap_err();

        assert!(matches!(err, Error::ShapeMismatch { .. }));
        assert!(tensor.iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_write_single_slot() {
        let mut tensor = Array4::<f32>::from_elem((3, 2, 2, 3), -1.0);
        let image = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));

        pixels_to_tensor_at(&image, &mut tensor, false, 1).unwrap();

        assert!(tensor.index_axis(Axis(0), 0).iter().all(|&v| v == -1.0));
        assert!(tensor.index_axis(Axis(0), 1).iter().all(|&v| v == 1.0));
        assert!(tensor.index_axis(Axis(0), 2).iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_write_single_slot_matches_batch() {
        let images = vec![RgbImage::new(2, 2), quad()];
        let batch = pixels_to_new_tensor(&images, true).unwrap();

        let mut tensor = Array4::<f32>::zeros((2, 2, 2, 1));
        pixels_to_tensor_at(&images[1], &mut tensor, true, 1).unwrap();

        assert_eq!(batch, tensor);
    }

    #[test]
    fn test_write_single_slot_errors() {
        let mut tensor = Array4::<f32>::zeros((2, 2, 2, 3));
        let image = RgbImage::new(2, 2);

        assert!(matches!(
            pixels_to_tensor_at(&image, &mut tensor, false, 2),
            Err(Error::BatchIndexOutOfRange { index: 2, batch: 2 })
        ));
        assert!(matches!(
            pixels_to_tensor_at(&RgbImage::new(4, 2), &mut tensor, false, 0),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
