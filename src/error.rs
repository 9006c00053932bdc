use thiserror::Error;

/// Top-level error type for the BlobSketch kernel.
#[derive(Debug, Error)]
pub enum BlobSketchError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to boundary mesh construction.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("invalid boundary loop: {0}")]
    InvalidLoop(String),

    #[error("triangulation failed: {0}")]
    TriangulationFailed(String),

    #[error("triangulated loop has no interior faces")]
    EmptyInterior,
}

/// Errors related to sketch operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`BlobSketchError`].
pub type Result<T> = std::result::Result<T, BlobSketchError>;
