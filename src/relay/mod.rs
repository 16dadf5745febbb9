//! Signed transaction broadcast.
//!
//! Success means mempool acceptance, not finality. Failures split into
//! two classes with different retry semantics: a node rejection is fatal
//! and needs a new intent (the nonce or fees are stale), while a transport
//! failure is retryable. Resubmitting the identical signed bytes is
//! idempotent, so retrying a failed broadcast is always safe.

use alloy::primitives::B256;
use alloy::transports::RpcError as TransportRpcError;
use thiserror::Error;
use tokio::time::timeout;

use crate::assemble::SignedTransaction;
use crate::observability::metrics;
use crate::rpc::registry::ChainRegistry;
use crate::rpc::types::ChainId;

/// Errors raised while broadcasting.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A node accepted the request and rejected the transaction.
    /// Fatal: requires a fresh intent.
    #[error("Broadcast rejected by node: {0}")]
    Rejected(String),

    /// No node could be reached. Retryable with the same signed bytes.
    #[error("Broadcast endpoint unreachable: {0}")]
    Unreachable(String),

    /// The transaction targets a chain this engine is not configured for.
    #[error("Chain {0} is not configured")]
    UnknownChain(u64),
}

impl RelayError {
    /// Whether resubmitting the identical signed bytes is safe and useful.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RelayError::Unreachable(_))
    }
}

/// Broadcasts finished transactions to their target chain.
pub struct Relay<'a> {
    registry: &'a ChainRegistry,
}

impl<'a> Relay<'a> {
    pub fn new(registry: &'a ChainRegistry) -> Self {
        Self { registry }
    }

    /// Broadcast a signed transaction, returning its hash on acceptance.
    pub async fn broadcast(&self, signed: &SignedTransaction) -> Result<B256, RelayError> {
        let client = self
            .registry
            .get(ChainId(signed.chain_id))
            .ok_or(RelayError::UnknownChain(signed.chain_id))?;

        for (i, provider) in client.providers().iter().enumerate() {
            let fut = provider.send_raw_transaction(&signed.raw);
            match timeout(client.timeout_duration(), fut).await {
                Ok(Ok(pending)) => {
                    let tx_hash = *pending.tx_hash();
                    metrics::record_relay(signed.chain_id, "accepted");
                    tracing::info!(
                        chain_id = signed.chain_id,
                        tx_hash = %tx_hash,
                        "Transaction accepted into the mempool"
                    );
                    return Ok(tx_hash);
                }
                Ok(Err(TransportRpcError::ErrorResp(payload))) => {
                    // The node heard us and said no; other nodes will too.
                    metrics::record_relay(signed.chain_id, "rejected");
                    tracing::warn!(
                        chain_id = signed.chain_id,
                        code = payload.code,
                        message = %payload.message,
                        "Broadcast rejected"
                    );
                    return Err(RelayError::Rejected(payload.message.to_string()));
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "Broadcast transport error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "Broadcast timeout, trying next provider");
                }
            }
        }

        metrics::record_relay(signed.chain_id, "unreachable");
        Err(RelayError::Unreachable(
            "all providers failed to broadcast".to_string(),
        ))
    }
}
