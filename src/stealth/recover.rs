//! Recipient-side stealth private key recovery.

use k256::{NonZeroScalar, PublicKey, Scalar, SecretKey};

use crate::stealth::secret::hashed_shared_secret;
use crate::stealth::types::{ensure_supported_scheme, StealthError, StealthResult};

/// Recover the private key for a stealth address announced to us.
///
/// `stealth_sk = (spending_sk + keccak256(ECDH(viewing_sk, ephemeral_pk).x)) mod n`
///
/// Invariant: the public key of the returned secret equals the stealth
/// public key the sender derived from the same ephemeral/viewing/spending
/// inputs.
pub fn compute_stealth_key(
    ephemeral_public_key: &PublicKey,
    spending_private_key: &SecretKey,
    viewing_private_key: &SecretKey,
    scheme_id: u64,
) -> StealthResult<SecretKey> {
    ensure_supported_scheme(scheme_id)?;

    let shared =
        hashed_shared_secret(&viewing_private_key.to_nonzero_scalar(), ephemeral_public_key)?;

    let stealth_scalar: Scalar = *spending_private_key.to_nonzero_scalar() + shared.tweak;
    let nonzero: Option<NonZeroScalar> = NonZeroScalar::new(stealth_scalar).into();
    nonzero
        .map(SecretKey::from)
        .ok_or(StealthError::InvalidScalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::address_from_public_key;
    use crate::stealth::generate::generate_stealth_address;
    use crate::stealth::types::StealthMetaAddress;

    #[test]
    fn test_recovered_key_controls_generated_address() {
        let mut rng = rand::thread_rng();
        let spend = SecretKey::random(&mut rng);
        let view = SecretKey::random(&mut rng);
        let meta = StealthMetaAddress {
            spending: spend.public_key(),
            viewing: view.public_key(),
        };
        let eph = SecretKey::random(&mut rng);

        let bundle = generate_stealth_address(&meta.to_hex(), 1, Some(eph)).unwrap();
        let recovered =
            compute_stealth_key(&bundle.ephemeral_public_key, &spend, &view, 1).unwrap();

        assert_eq!(
            address_from_public_key(&recovered.public_key()),
            bundle.stealth_address
        );
    }

    #[test]
    fn test_wrong_viewing_key_recovers_nothing() {
        let mut rng = rand::thread_rng();
        let spend = SecretKey::random(&mut rng);
        let view = SecretKey::random(&mut rng);
        let other_view = SecretKey::random(&mut rng);
        let meta = StealthMetaAddress {
            spending: spend.public_key(),
            viewing: view.public_key(),
        };

        let bundle = generate_stealth_address(&meta.to_hex(), 1, None).unwrap();
        let recovered =
            compute_stealth_key(&bundle.ephemeral_public_key, &spend, &other_view, 1).unwrap();

        assert_ne!(
            address_from_public_key(&recovered.public_key()),
            bundle.stealth_address
        );
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let mut rng = rand::thread_rng();
        let sk = SecretKey::random(&mut rng);
        let err = compute_stealth_key(&sk.public_key(), &sk, &sk, 7).unwrap_err();
        assert!(matches!(err, StealthError::UnsupportedScheme(7)));
    }
}
