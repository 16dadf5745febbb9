//! Sender-side stealth address generation.

use alloy::primitives::Address;
use k256::{ProjectivePoint, PublicKey, SecretKey};

use crate::kdf::address_from_public_key;
use crate::stealth::meta_address::parse_meta_address_uri;
use crate::stealth::secret::hashed_shared_secret;
use crate::stealth::types::{ensure_supported_scheme, StealthError, StealthResult};

/// Everything the sender needs to pay and announce a stealth recipient.
///
/// The ephemeral *private* key is consumed by generation and dropped; only
/// its public half leaves this function.
#[derive(Debug, Clone)]
pub struct StealthAddressBundle {
    /// One-time recipient address.
    pub stealth_address: Address,
    /// Ephemeral public key to publish in the announcement.
    pub ephemeral_public_key: PublicKey,
    /// View tag to publish in the announcement.
    pub view_tag: u8,
}

/// Generate a one-time stealth address for a recipient's meta-address.
///
/// `ephemeral` lets a caller supply its own ephemeral secret (it is used
/// once and never stored); `None` generates a fresh one.
pub fn generate_stealth_address(
    meta_address_uri: &str,
    scheme_id: u64,
    ephemeral: Option<SecretKey>,
) -> StealthResult<StealthAddressBundle> {
    ensure_supported_scheme(scheme_id)?;
    let meta = parse_meta_address_uri(meta_address_uri)?;

    let ephemeral = ephemeral.unwrap_or_else(|| SecretKey::random(&mut rand::thread_rng()));
    let shared = hashed_shared_secret(&ephemeral.to_nonzero_scalar(), &meta.viewing)?;

    let stealth_point =
        ProjectivePoint::from(*meta.spending.as_affine()) + ProjectivePoint::GENERATOR * shared.tweak;
    let stealth_public_key = PublicKey::from_affine(stealth_point.to_affine())
        .map_err(|_| StealthError::InvalidKey("stealth key is the identity".into()))?;

    Ok(StealthAddressBundle {
        stealth_address: address_from_public_key(&stealth_public_key),
        ephemeral_public_key: ephemeral.public_key(),
        view_tag: shared.view_tag,
    })
}
