//! Remote threshold-signer client.
//!
//! # Data Flow
//! ```text
//! signing hash + derivation path
//!     → types.rs (SignRequest with fixed protocol constants)
//!     → client.rs (HTTP round trip, or fetch by completion reference
//!       after an interrupted flow)
//!     → SignatureResponse {big_r, s, recovery_id}
//! ```
//!
//! # Security Constraints
//! - No private key material on this side; the signer is addressed purely
//!   by payload + derivation path
//! - Signature shares are consumed once and never persisted

pub mod client;
pub mod types;

pub use client::{HttpSignerClient, SignerService};
pub use types::{MpcError, SignRequest, SignatureResponse, SIGN_DEPOSIT_YOCTO, SIGN_GAS};
