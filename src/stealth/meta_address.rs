//! Stealth meta-address URI parsing.
//!
//! Accepted forms, per the announcement registry convention:
//! - `st:<chainRef>:0x<33-byte spend pk><33-byte view pk>`
//! - the bare hex payload, with or without the `0x` prefix

use k256::PublicKey;

use crate::stealth::types::{StealthError, StealthMetaAddress, StealthResult};

/// Combined length of the two compressed public keys.
const META_ADDRESS_LEN: usize = 66;

/// Parse a stealth meta-address URI or bare hex payload.
pub fn parse_meta_address_uri(uri: &str) -> StealthResult<StealthMetaAddress> {
    let payload = match uri.strip_prefix("st:") {
        Some(rest) => {
            let (_chain_ref, hex) = rest.split_once(':').ok_or_else(|| {
                StealthError::MetaAddressParse("URI is missing the chain segment".into())
            })?;
            hex
        }
        None => uri,
    };
    let payload = payload.strip_prefix("0x").unwrap_or(payload);

    let bytes = alloy::hex::decode(payload)
        .map_err(|e| StealthError::MetaAddressParse(format!("invalid hex: {e}")))?;
    if bytes.len() != META_ADDRESS_LEN {
        return Err(StealthError::MetaAddressParse(format!(
            "expected {} bytes, got {}",
            META_ADDRESS_LEN,
            bytes.len()
        )));
    }

    let spending = PublicKey::from_sec1_bytes(&bytes[..33])
        .map_err(|e| StealthError::MetaAddressParse(format!("spending key: {e}")))?;
    let viewing = PublicKey::from_sec1_bytes(&bytes[33..])
        .map_err(|e| StealthError::MetaAddressParse(format!("viewing key: {e}")))?;

    Ok(StealthMetaAddress { spending, viewing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::SecretKey;

    fn sample_meta() -> StealthMetaAddress {
        let mut rng = rand::thread_rng();
        StealthMetaAddress {
            spending: SecretKey::random(&mut rng).public_key(),
            viewing: SecretKey::random(&mut rng).public_key(),
        }
    }

    #[test]
    fn test_parse_uri_round_trip() {
        let meta = sample_meta();
        assert_eq!(parse_meta_address_uri(&meta.to_uri("eth")).unwrap(), meta);
    }

    #[test]
    fn test_parse_bare_hex() {
        let meta = sample_meta();
        let hex = meta.to_hex();
        assert_eq!(parse_meta_address_uri(&hex).unwrap(), meta);
        // Without the 0x prefix too.
        assert_eq!(
            parse_meta_address_uri(hex.trim_start_matches("0x")).unwrap(),
            meta
        );
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(matches!(
            parse_meta_address_uri("st:eth").unwrap_err(),
            StealthError::MetaAddressParse(_)
        ));
        assert!(matches!(
            parse_meta_address_uri("st:eth:0xzz").unwrap_err(),
            StealthError::MetaAddressParse(_)
        ));
        // Right length, but not valid curve points.
        let zeros = format!("0x{}", "00".repeat(66));
        assert!(matches!(
            parse_meta_address_uri(&zeros).unwrap_err(),
            StealthError::MetaAddressParse(_)
        ));
        // Truncated payload.
        let short = format!("0x{}", "02".repeat(40));
        assert!(matches!(
            parse_meta_address_uri(&short).unwrap_err(),
            StealthError::MetaAddressParse(_)
        ));
    }
}
