//! Chain-specific types and error definitions.

use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors that can occur during chain read operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// RPC connection or request failed on every provider.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The endpoint URL could not be parsed.
    #[error("Invalid RPC URL '{0}': {1}")]
    InvalidUrl(String, String),

    /// A contract response failed to decode.
    #[error("Contract response decoding failed: {0}")]
    Decode(String),

    /// A required contract address is not configured for this chain.
    #[error("No {0} contract configured for chain {1}")]
    MissingContract(&'static str, u64),
}

/// Result type for chain read operations.
pub type RpcResult<T> = Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(11155111u64);
        assert_eq!(chain_id.0, 11155111);
        assert_eq!(u64::from(chain_id), 11155111);
    }

    #[test]
    fn test_error_display() {
        let err = RpcError::MissingContract("usdc", 84532);
        assert_eq!(
            err.to_string(),
            "No usdc contract configured for chain 84532"
        );
    }
}
