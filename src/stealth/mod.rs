//! EIP-5564 stealth addresses (scheme 1, secp256k1 with view tags).
//!
//! # Data Flow
//! ```text
//! Sender:
//!   recipient meta-address (spend pk, view pk)
//!       → generate.rs (ephemeral ECDH, P = spend + H(ss)·G)
//!       → one-time stealth address + ephemeral pk + view tag
//!
//! Recipient:
//!   announcement (ephemeral pk, view tag)
//!       → scan.rs (tag prefilter, then full derivation)
//!       → recover.rs (p = spend_sk + H(ss) mod n)
//! ```
//!
//! # Security Constraints
//! - Scheme ids other than 1 are rejected before any curve operation
//! - Ephemeral private keys are dropped on return, never persisted
//! - Viewing/spending secrets stay in caller-owned `SecretKey` values

pub mod generate;
pub mod meta_address;
pub mod recover;
pub mod scan;
mod secret;
pub mod types;

pub use generate::{generate_stealth_address, StealthAddressBundle};
pub use meta_address::parse_meta_address_uri;
pub use recover::compute_stealth_key;
pub use scan::scan_announcements;
pub use types::{Announcement, StealthError, StealthMetaAddress, SCHEME_ID_SECP256K1};
