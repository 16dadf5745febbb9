//! Announcement scanning with view-tag prefiltering.

use k256::{ProjectivePoint, PublicKey, SecretKey};

use crate::kdf::address_from_public_key;
use crate::observability::metrics;
use crate::stealth::secret::hashed_shared_secret;
use crate::stealth::types::{Announcement, StealthResult, SCHEME_ID_SECP256K1};

/// Scan announcements for payments addressed to us.
///
/// The candidate shared secret and its view tag are computed first; the
/// point addition and address derivation only run when the tag matches the
/// announced one. Tag comparison rejects roughly 255/256 of non-matching
/// announcements before any second curve multiplication, and a true match
/// always passes the tag check (same hash on both sides).
pub fn scan_announcements(
    viewing_private_key: &SecretKey,
    spending_public_key: &PublicKey,
    announcements: &[Announcement],
) -> StealthResult<Vec<Announcement>> {
    let viewing_scalar = viewing_private_key.to_nonzero_scalar();
    let spending_point = ProjectivePoint::from(*spending_public_key.as_affine());
    let mut matches = Vec::new();

    for announcement in announcements {
        if announcement.scheme_id != SCHEME_ID_SECP256K1 {
            continue;
        }
        let ephemeral = match PublicKey::from_sec1_bytes(&announcement.ephemeral_public_key) {
            Ok(pk) => pk,
            Err(e) => {
                // Announcements are externally sourced; skip garbage.
                tracing::debug!(error = %e, "Skipping announcement with malformed ephemeral key");
                continue;
            }
        };

        let shared = hashed_shared_secret(&viewing_scalar, &ephemeral)?;
        if shared.view_tag != announcement.view_tag {
            continue;
        }

        let stealth_point = spending_point + ProjectivePoint::GENERATOR * shared.tweak;
        let matched = PublicKey::from_affine(stealth_point.to_affine())
            .map(|pk| address_from_public_key(&pk) == announcement.stealth_address)
            .unwrap_or(false);
        if matched {
            matches.push(announcement.clone());
        }
    }

    metrics::record_scan(announcements.len(), matches.len());
    Ok(matches)
}
