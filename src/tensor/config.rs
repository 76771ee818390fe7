//! Conversion settings.

use std::path::Path;

use crate::error::{Error, Result};
use crate::image::load_batch;

use super::{channels_for, pixels_to_new_tensor, ObservationTensor};

/// Configuration for turning image files into an observation tensor.
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    /// Collapse RGB into a single averaged channel.
    pub grayscale: bool,

    /// Resize every image to `(width, height)` after decoding. None keeps the
    /// decoded size, in which case all inputs must already match.
    pub resize: Option<(u32, u32)>,
}

impl ConvertConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if let Some((width, height)) = self.resize {
            if width == 0 || height == 0 {
                return Err(Error::InvalidParameter {
                    name: "resize".to_string(),
                    reason: format!("dimensions must be greater than 0, got {width}x{height}"),
                });
            }
        }

        Ok(())
    }

    /// Channel count of tensors produced with this configuration.
    #[must_use]
    pub const fn channels(&self) -> usize {
        channels_for(self.grayscale)
    }

    /// Load image files and convert them into a freshly allocated tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, an image cannot be
    /// decoded, or the decoded images do not form a uniform batch.
    pub fn load_and_convert<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ObservationTensor> {
        self.validate()?;

        let images = load_batch(paths, self.resize)?;
        let tensor = pixels_to_new_tensor(&images, self.grayscale)?;

        tracing::debug!("Converted {} image(s) into {:?}", images.len(), tensor.shape());

        Ok(tensor)
    }
}
