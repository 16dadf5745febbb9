//! Unsigned transaction construction.
//!
//! # Data Flow
//! ```text
//! TransactionIntent (user action)
//!     → gas.rs (base fee + suggested price + fixed buffer)
//!     → builder.rs (nonce fetch, EIP-1559 assembly, signing hash)
//!     → PendingTransaction persisted to the session store
//!       BEFORE the unsigned payload is returned
//! ```
//!
//! Persisting first is what makes the signing flow crash-consistent: a
//! restart mid-flow reconstructs the exact transaction bytes instead of
//! losing the intent.

pub mod builder;
pub mod gas;
pub mod types;

pub use builder::{PayloadBuilder, GAS_LIMIT};
pub use gas::{compute_max_fee, GasQuote};
pub use types::{PayloadError, PendingTransaction, TransactionIntent, TransferCall, UnsignedPayload};
