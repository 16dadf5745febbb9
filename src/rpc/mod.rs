//! Chain RPC subsystem.
//!
//! # Data Flow
//! ```text
//! EngineConfig chain entries
//!     → registry.rs (one ChainClient per chain id, built once)
//!     → client.rs (failover providers with timeouts)
//!     → contracts.rs (closed set of typed contract commands)
//! ```
//!
//! # Security Constraints
//! - Read operations only reveal public chain state
//! - Contract calls go through the typed command set, never a
//!   method-name-as-string dispatch
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contracts;
pub mod registry;
pub mod types;

pub use client::ChainClient;
pub use contracts::ContractCall;
pub use registry::ChainRegistry;
pub use types::{ChainId, RpcError};
