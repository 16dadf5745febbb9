//! EIP-1559 gas quoting.

use serde::{Deserialize, Serialize};

use crate::payload::types::PayloadError;
use crate::rpc::client::ChainClient;

/// A fee quote for one payload build. Never cached across calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GasQuote {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// `max(base fee, suggested gas price) + fixed buffer`, in wei.
pub fn compute_max_fee(base_fee: u128, suggested_gas_price: u128, buffer: u128) -> u128 {
    base_fee.max(suggested_gas_price).saturating_add(buffer)
}

/// Quote gas for a chain from its latest block and node suggestions.
///
/// Chains without a base-fee field are not EIP-1559 chains and are
/// rejected as unsupported.
pub async fn quote_gas(client: &ChainClient) -> Result<GasQuote, PayloadError> {
    let base_fee = client
        .get_base_fee()
        .await?
        .ok_or_else(|| PayloadError::UnsupportedChain {
            chain_id: client.chain_id().0,
            reason: "latest block has no base fee field".to_string(),
        })?;
    let gas_price = client.get_gas_price().await?;
    let max_priority_fee_per_gas = client.get_max_priority_fee().await?;

    let max_fee_per_gas = compute_max_fee(base_fee, gas_price, client.config().fee_buffer_wei);
    tracing::debug!(
        chain_id = client.chain_id().0,
        base_fee,
        gas_price,
        max_fee_per_gas,
        max_priority_fee_per_gas,
        "Gas quoted"
    );

    Ok(GasQuote {
        max_fee_per_gas,
        max_priority_fee_per_gas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_applies_to_the_larger_fee() {
        // base fee dominates
        assert_eq!(compute_max_fee(100, 80, 20), 120);
        // suggested price dominates
        assert_eq!(compute_max_fee(50, 80, 20), 100);
        // equal
        assert_eq!(compute_max_fee(80, 80, 20), 100);
    }

    #[test]
    fn test_max_fee_saturates() {
        assert_eq!(compute_max_fee(u128::MAX, 0, 1), u128::MAX);
    }
}
