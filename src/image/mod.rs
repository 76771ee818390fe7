//! Image loading and tensor preview utilities.

mod load;
mod save;

pub use load::{load_batch, load_image};
pub use save::save_tensor_image;
