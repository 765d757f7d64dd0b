// covistat-core/src/error.rs

use crate::domain::error::{AggregationError, DataLoadError};
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovistatError {
    // --- ERREURS DU DOMAINE (Chargement, Agrégation) ---
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for CovistatError {
    fn from(err: std::io::Error) -> Self {
        CovistatError::Infrastructure(InfrastructureError::Io(err))
    }
}
