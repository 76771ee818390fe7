//! Observation tensors and segment offsets.

mod config;
mod convert;
mod offsets;

pub use config::ConvertConfig;
pub use convert::{pixels_to_new_tensor, pixels_to_tensor, pixels_to_tensor_at};
pub use offsets::{prefix_sum, segment_ranges, split_segments};

use ndarray::Array4;

/// Observation tensor in NHWC format (batch, height, width, channels).
/// Values are normalized to [0, 1].
pub type ObservationTensor = Array4<f32>;

/// Number of channels in color observations.
pub const RGB_CHANNELS: usize = 3;

/// Number of channels in grayscale observations.
pub const GRAYSCALE_CHANNELS: usize = 1;

/// Channel count a tensor must have for the requested mode.
#[must_use]
pub const fn channels_for(grayscale: bool) -> usize {
    if grayscale {
        GRAYSCALE_CHANNELS
    } else {
        RGB_CHANNELS
    }
}
