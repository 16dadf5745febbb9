//! Deterministic child key and address derivation.
//!
//! # Data Flow
//! ```text
//! root public key (shared, supplied at startup)
//!     + account id + derivation path
//!     → derive.rs (tweak = hash, child = root + tweak·G)
//!     → EVM address (keccak of uncompressed point)
//! ```
//!
//! # Security Constraints
//! - Pure functions of public inputs; no secret material enters this module
//! - Identical inputs always yield identical output, so addresses are
//!   recomputed on demand rather than stored

pub mod derive;
pub mod types;

pub use derive::{address_from_public_key, derive_child_public_key, derive_evm_address, parse_root_public_key};
pub use types::DerivationError;
