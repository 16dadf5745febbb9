//! Semantic configuration validation.
//!
//! Serde handles syntax; this module checks the relationships serde cannot:
//! unique chain ids, parseable endpoints, a decodable root key.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::EngineConfig;
use crate::kdf;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("root_public_key: {0}")]
    RootKey(String),

    #[error("no chains configured")]
    NoChains,

    #[error("chain '{0}': duplicate chain_id {1}")]
    DuplicateChainId(String, u64),

    #[error("chain '{0}': invalid RPC URL '{1}'")]
    InvalidRpcUrl(String, String),

    #[error("chain '{0}': invalid address in '{1}'")]
    InvalidAddress(String, String),
}

/// Validate a parsed configuration, collecting all failures.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = kdf::parse_root_public_key(&config.root_public_key) {
        errors.push(ValidationError::RootKey(e.to_string()));
    }

    if config.chains.is_empty() {
        errors.push(ValidationError::NoChains);
    }

    let mut seen = HashSet::new();
    for chain in &config.chains {
        if !seen.insert(chain.chain_id) {
            errors.push(ValidationError::DuplicateChainId(
                chain.name.clone(),
                chain.chain_id,
            ));
        }
        for url in std::iter::once(&chain.rpc_url).chain(chain.failover_urls.iter()) {
            if url.parse::<url::Url>().is_err() {
                errors.push(ValidationError::InvalidRpcUrl(
                    chain.name.clone(),
                    url.clone(),
                ));
            }
        }
        for addr in [&chain.usdc, &chain.stealth_registry, &chain.stealth_announcer]
            .into_iter()
            .flatten()
        {
            if addr.parse::<alloy::primitives::Address>().is_err() {
                errors.push(ValidationError::InvalidAddress(
                    chain.name.clone(),
                    addr.clone(),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
