//! Shared-secret derivation common to generation, recovery, and scanning.

use alloy::primitives::keccak256;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, PublicKey, Scalar};

use crate::stealth::types::{StealthError, StealthResult};

/// Hashed ECDH output: the additive tweak and the announcement view tag.
///
/// Both sides of the scheme must derive this identically: the sender from
/// (ephemeral secret, viewing public key), the recipient from (viewing
/// secret, ephemeral public key).
#[derive(Debug, Clone, Copy)]
pub(crate) struct HashedSharedSecret {
    /// keccak256 of the shared point's x-coordinate, reduced mod n.
    pub tweak: Scalar,
    /// First byte of that hash.
    pub view_tag: u8,
}

pub(crate) fn hashed_shared_secret(
    secret: &Scalar,
    public: &PublicKey,
) -> StealthResult<HashedSharedSecret> {
    let shared = ProjectivePoint::from(*public.as_affine()) * *secret;
    let encoded = shared.to_affine().to_encoded_point(false);
    let x = encoded
        .x()
        .ok_or_else(|| StealthError::InvalidKey("shared secret is the identity".into()))?;

    let digest = keccak256(x.as_slice());
    let tweak = <Scalar as Reduce<k256::U256>>::reduce_bytes(&<[u8; 32]>::from(digest).into());
    Ok(HashedSharedSecret {
        tweak,
        view_tag: digest[0],
    })
}
