use crate::error::{OperationError, Result};

/// Host-facing sketch tunables with their documented ranges.
#[derive(Debug, Clone, Copy)]
pub struct SketchParams {
    /// Surface density divisor for [`BlobLayout`](super::BlobLayout):
    /// higher values produce denser blob geometry. Minimum 0.
    pub density: f64,
    /// Resample count handed to [`ResampleLoop`](super::ResampleLoop):
    /// how many boundary vertices (and medial circles) a confirmed sketch
    /// produces. Minimum 20.
    pub quality: usize,
}

impl Default for SketchParams {
    fn default() -> Self {
        Self {
            density: 5.0,
            quality: 200,
        }
    }
}

impl SketchParams {
    /// Validates the parameters against their documented ranges.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` when `density` is negative or
    /// `quality` is below 20.
    pub fn validate(&self) -> Result<()> {
        if self.density < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "density must be non-negative, got {}",
                self.density
            ))
            .into());
        }
        if self.quality < 20 {
            return Err(OperationError::InvalidInput(format!(
                "quality must be at least 20, got {}",
                self.quality
            ))
            .into());
        }
        Ok(())
    }
}
