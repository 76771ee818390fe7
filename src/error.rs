//! Custom error types for pixel-tensor.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the pixel-tensor library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image batch contains no images.
    #[error("image batch is empty")]
    EmptyBatch,

    /// An image in the batch does not share the dimensions of the first one.
    #[error("image {index} has size {actual:?}, expected {expected:?}")]
    InconsistentImageSize {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Batch slot is outside the tensor's batch dimension.
    #[error("batch index {index} out of range for batch of {batch}")]
    BatchIndexOutOfRange { index: usize, batch: usize },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

/// Result type alias for pixel-tensor operations.
pub type Result<T> = std::result::Result<T, Error>;
