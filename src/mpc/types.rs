//! Wire types for the remote signing service.

use alloy::primitives::{Signature, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compute budget attached to every signing request.
pub const SIGN_GAS: u64 = 100_000_000_000_000;

/// Deposit attached to every signing request (0.25 in yocto units).
pub const SIGN_DEPOSIT_YOCTO: &str = "250000000000000000000000";

/// Errors from the remote signer exchange.
#[derive(Debug, Error)]
pub enum MpcError {
    /// Transport-level failure reaching the service.
    #[error("Signer unreachable: {0}")]
    Http(String),

    /// The service answered with an error.
    #[error("Signer error: {0}")]
    Service(String),

    /// The response could not be decoded into signature shares.
    #[error("Malformed signer response: {0}")]
    MalformedResponse(String),
}

/// A signing request: the payload to sign and the key slot to sign under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRequest {
    /// The 32-byte signing hash, as a byte array on the wire.
    pub payload: [u8; 32],
    /// Derivation path selecting the child key.
    pub path: String,
    /// Key version; fixed at 0 for this deployment.
    pub key_version: u32,
}

/// Big-R component of the signature share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffinePoint {
    /// SEC1 compressed point, hex without 0x prefix.
    pub affine_point: String,
}

/// Scalar component of the signature share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scalar {
    /// 32-byte scalar, hex without 0x prefix.
    pub scalar: String,
}

/// The signature shares returned by the signer, consumed exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureResponse {
    pub big_r: AffinePoint,
    pub s: Scalar,
    pub recovery_id: u8,
}

impl SignatureResponse {
    /// Construct from raw components (used when the caller already holds
    /// r/s/v, e.g. in tests or alternative transports).
    pub fn from_parts(big_r_compressed_hex: &str, s_hex: &str, recovery_id: u8) -> Self {
        Self {
            big_r: AffinePoint {
                affine_point: big_r_compressed_hex.trim_start_matches("0x").to_string(),
            },
            s: Scalar {
                scalar: s_hex.trim_start_matches("0x").to_string(),
            },
            recovery_id,
        }
    }

    /// Reassemble into an ECDSA signature.
    ///
    /// `r` is the x-coordinate of big_r (SEC1 prefix byte stripped);
    /// the parity bit comes from the recovery id.
    pub fn to_signature(&self) -> Result<Signature, MpcError> {
        let r_bytes = alloy::hex::decode(self.big_r.affine_point.trim_start_matches("0x"))
            .map_err(|e| MpcError::MalformedResponse(format!("big_r: {e}")))?;
        if r_bytes.len() != 33 {
            return Err(MpcError::MalformedResponse(format!(
                "big_r must be a 33-byte compressed point, got {} bytes",
                r_bytes.len()
            )));
        }
        let s_bytes = alloy::hex::decode(self.s.scalar.trim_start_matches("0x"))
            .map_err(|e| MpcError::MalformedResponse(format!("s: {e}")))?;
        if s_bytes.len() != 32 {
            return Err(MpcError::MalformedResponse(format!(
                "s must be a 32-byte scalar, got {} bytes",
                s_bytes.len()
            )));
        }

        let r = U256::from_be_slice(&r_bytes[1..]);
        let s = U256::from_be_slice(&s_bytes);
        Ok(Signature::new(r, s, self.recovery_id & 1 == 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_request_wire_shape() {
        let request = SignRequest {
            payload: [7u8; 32],
            path: "ethereum-1".to_string(),
            key_version: 0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["payload"].as_array().unwrap().len(), 32);
        assert_eq!(json["path"], "ethereum-1");
        assert_eq!(json["key_version"], 0);
    }

    #[test]
    fn test_response_to_signature() {
        let response = SignatureResponse::from_parts(
            &format!("02{}", "11".repeat(32)),
            &"22".repeat(32),
            1,
        );
        let signature = response.to_signature().unwrap();
        assert_eq!(signature.r(), U256::from_be_slice(&[0x11; 32]));
        assert_eq!(signature.s(), U256::from_be_slice(&[0x22; 32]));
        assert!(signature.v());
    }

    #[test]
    fn test_malformed_shares_rejected() {
        let bad_r = SignatureResponse::from_parts("0204", &"22".repeat(32), 0);
        assert!(matches!(
            bad_r.to_signature(),
            Err(MpcError::MalformedResponse(_))
        ));

        let bad_s = SignatureResponse::from_parts(&format!("02{}", "11".repeat(32)), "2233", 0);
        assert!(matches!(
            bad_s.to_signature(),
            Err(MpcError::MalformedResponse(_))
        ));
    }
}
