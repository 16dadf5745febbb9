//! Epsilon derivation: additive, non-hardened child keys from a shared root.
//!
//! The remote threshold signer holds the root key material; this side only
//! ever sees the root *public* key and derives the matching child public
//! keys with `child = root + H(account_id, path)·G`.

use alloy::primitives::{keccak256, Address};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, PublicKey, Scalar};
use sha3::{Digest, Sha3_256};

use crate::kdf::types::{DerivationError, DerivationResult};

/// Domain separator for the derivation tweak hash.
pub const EPSILON_DERIVATION_PREFIX: &str = "near-mpc-recovery v0.1.0 epsilon derivation:";

/// Compute the scalar tweak for an (account, path) slot.
///
/// `tweak = SHA3-256(prefix ‖ account_id ‖ "," ‖ path) mod n`
pub fn derivation_tweak(account_id: &str, path: &str) -> Scalar {
    let mut hasher = Sha3_256::new();
    hasher.update(EPSILON_DERIVATION_PREFIX.as_bytes());
    hasher.update(account_id.as_bytes());
    hasher.update(b",");
    hasher.update(path.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    <Scalar as Reduce<k256::U256>>::reduce_bytes(&digest.into())
}

/// Parse a SEC1-encoded root public key from hex (with or without 0x prefix).
pub fn parse_root_public_key(hex: &str) -> DerivationResult<PublicKey> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let bytes = alloy::hex::decode(hex)
        .map_err(|e| DerivationError::InvalidRootKey(e.to_string()))?;
    PublicKey::from_sec1_bytes(&bytes)
        .map_err(|e| DerivationError::InvalidRootKey(e.to_string()))
}

/// Derive the child public key for an (account, path) slot.
///
/// Deterministic: identical inputs always yield the identical point.
pub fn derive_child_public_key(
    root: &PublicKey,
    account_id: &str,
    path: &str,
) -> DerivationResult<PublicKey> {
    let tweak = derivation_tweak(account_id, path);
    let child = ProjectivePoint::from(*root.as_affine()) + ProjectivePoint::GENERATOR * tweak;
    PublicKey::from_affine(child.to_affine()).map_err(|_| DerivationError::PointAtInfinity)
}

/// EVM address of a public key: last 20 bytes of the keccak256 of the
/// 64-byte uncompressed point body.
pub fn address_from_public_key(key: &PublicKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&digest[12..])
}

/// Derive the EVM address for an (account, path) slot in one step.
pub fn derive_evm_address(
    root: &PublicKey,
    account_id: &str,
    path: &str,
) -> DerivationResult<Address> {
    let child = derive_child_public_key(root, account_id, path)?;
    Ok(address_from_public_key(&child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::SecretKey;

    // Anvil's first account: key and address are publicly known.
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn test_root() -> PublicKey {
        let bytes = alloy::hex::decode(TEST_PRIVATE_KEY).unwrap();
        SecretKey::from_slice(&bytes).unwrap().public_key()
    }

    #[test]
    fn test_address_from_known_key() {
        let addr = address_from_public_key(&test_root());
        assert_eq!(addr.to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let root = test_root();
        let a = derive_evm_address(&root, "alice.test", "chain-1").unwrap();
        let b = derive_evm_address(&root, "alice.test", "chain-1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_paths_yield_distinct_addresses() {
        let root = test_root();
        let a = derive_evm_address(&root, "alice.test", "ethereum-1").unwrap();
        let b = derive_evm_address(&root, "alice.test", "ethereum-2").unwrap();
        let c = derive_evm_address(&root, "bob.test", "ethereum-1").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_child_differs_from_root() {
        let root = test_root();
        let child = derive_child_public_key(&root, "alice.test", "ethereum-1").unwrap();
        assert_ne!(root, child);
    }

    #[test]
    fn test_root_key_parsing() {
        let root = test_root();
        let uncompressed = alloy::hex::encode(root.to_encoded_point(false).as_bytes());
        let compressed = alloy::hex::encode(root.to_encoded_point(true).as_bytes());

        assert_eq!(parse_root_public_key(&uncompressed).unwrap(), root);
        assert_eq!(parse_root_public_key(&compressed).unwrap(), root);
        assert_eq!(
            parse_root_public_key(&format!("0x{uncompressed}")).unwrap(),
            root
        );
        assert!(parse_root_public_key("not-hex").is_err());
        assert!(parse_root_public_key("0x0011").is_err());
    }
}
