//! Resumable signing sessions.
//!
//! # Data Flow
//! ```text
//! build_transaction ──▶ store.rs (durable PendingTransaction, written first)
//!                            │
//! request_signature ──▶ remote signer ──(same execution)──▶ SignatureReceived
//!                            │
//!         page/process restart + inbound completion reference
//!                            │
//!                       machine.rs resume:
//!                       (persisted entry, reference) → fetch shares,
//!                       SignatureReceived without resubmitting
//! ```
//!
//! # Design Decisions
//! - The store is the single shared mutable resource; it is written before
//!   any remote signing request and cleared only on relay success or abandon
//! - A per-intent lock prevents two overlapping submissions
//! - No client-side timeout on the signing round trip; the only
//!   cancellation is abandon, safe because nothing touched the chain yet

pub mod machine;
pub mod store;

pub use machine::{SessionError, SessionLocks, SessionState, SigningSession};
pub use store::{SessionStore, StoreError};
