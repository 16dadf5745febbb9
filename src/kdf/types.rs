//! Key derivation error definitions.

use thiserror::Error;

/// Errors that can occur during child key derivation.
#[derive(Debug, Error)]
pub enum DerivationError {
    /// The root public key could not be parsed as a curve point.
    #[error("Invalid root public key: {0}")]
    InvalidRootKey(String),

    /// The derived child point is the point at infinity.
    ///
    /// Probability is negligible for honest inputs but the check is required.
    #[error("Derived key maps to the point at infinity")]
    PointAtInfinity,
}

/// Result type for derivation operations.
pub type DerivationResult<T> = Result<T, DerivationError>;
