mod blob;
mod medial;
mod params;
mod resample;
mod smooth;

pub use blob::{Blob, BlobElement, BlobLayout};
pub use medial::{MedialApprox, MedialCircle, DEFAULT_PRECISION};
pub use params::SketchParams;
pub use resample::ResampleLoop;
pub use smooth::SmoothPolyline;
