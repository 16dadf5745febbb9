//! Stealth address types and error definitions.

use alloy::primitives::{Address, Bytes};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only supported stealth scheme: secp256k1 with view tags (EIP-5564).
pub const SCHEME_ID_SECP256K1: u64 = 1;

/// Errors that can occur during stealth address operations.
#[derive(Debug, Error)]
pub enum StealthError {
    /// The meta-address URI or hex payload is malformed.
    #[error("Malformed stealth meta-address: {0}")]
    MetaAddressParse(String),

    /// The requested scheme id is not supported.
    #[error("Unsupported stealth scheme id: {0}")]
    UnsupportedScheme(u64),

    /// A public key failed to parse or landed on the point at infinity.
    #[error("Invalid curve point: {0}")]
    InvalidKey(String),

    /// A derived private scalar was zero.
    #[error("Derived stealth key is the zero scalar")]
    InvalidScalar,
}

/// Result type for stealth operations.
pub type StealthResult<T> = Result<T, StealthError>;

/// A recipient's published meta-address: long-term spending and viewing keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StealthMetaAddress {
    /// Key the one-time address is spendable by (33-byte compressed on the wire).
    pub spending: PublicKey,
    /// Key used for the ECDH shared secret (33-byte compressed on the wire).
    pub viewing: PublicKey,
}

impl StealthMetaAddress {
    /// Encode as the 66-byte hex payload (no URI prefix).
    pub fn to_hex(&self) -> String {
        let mut bytes = Vec::with_capacity(66);
        bytes.extend_from_slice(self.spending.to_encoded_point(true).as_bytes());
        bytes.extend_from_slice(self.viewing.to_encoded_point(true).as_bytes());
        format!("0x{}", alloy::hex::encode(bytes))
    }

    /// Encode as a `st:<chain>:<hex>` URI.
    pub fn to_uri(&self, chain_ref: &str) -> String {
        format!("st:{}:{}", chain_ref, self.to_hex())
    }
}

/// An on-chain stealth payment announcement, externally sourced and read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    /// Stealth scheme the announcement was made under.
    pub scheme_id: u64,
    /// The announced one-time recipient address.
    pub stealth_address: Address,
    /// SEC1-encoded ephemeral public key published by the sender.
    pub ephemeral_public_key: Bytes,
    /// First byte of the hashed shared secret, for cheap prefiltering.
    pub view_tag: u8,
}

/// Reject any scheme id other than the supported one, before curve work.
pub fn ensure_supported_scheme(scheme_id: u64) -> StealthResult<()> {
    if scheme_id != SCHEME_ID_SECP256K1 {
        return Err(StealthError::UnsupportedScheme(scheme_id));
    }
    Ok(())
}
