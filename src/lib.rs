pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod spatial;

pub use error::{BlobSketchError, Result};
