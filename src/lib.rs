//! Client-side signing engine for an MPC-backed multi-chain payment portal.
//!
//! # Architecture Overview
//!
//! ```text
//!  root public key ──▶ kdf ──▶ sender address ─┐
//!                                              ▼
//!  recipient meta-address ──▶ stealth ──▶ payload ──▶ session ──▶ assemble ──▶ relay
//!                                            │           │
//!                                            │           ▼
//!                                            │      mpc (remote threshold signer)
//!                                            ▼
//!                                    durable session store
//!                                (survives page/process restart)
//!
//!  Cross-cutting: config (chain registry), observability (logging, metrics)
//! ```
//!
//! The engine never holds a private key for the signing flow: transaction
//! signatures come from a remote threshold-signing service addressed by a
//! derivation path, and the only secrets handled locally are the stealth
//! viewing/spending keys supplied by the caller.

pub mod assemble;
pub mod config;
pub mod kdf;
pub mod mpc;
pub mod observability;
pub mod payload;
pub mod relay;
pub mod rpc;
pub mod session;
pub mod stealth;

pub use config::schema::EngineConfig;
pub use payload::{PayloadBuilder, TransactionIntent, TransferCall};
pub use rpc::{ChainClient, ChainId, ChainRegistry};
pub use session::{SessionState, SigningSession};
