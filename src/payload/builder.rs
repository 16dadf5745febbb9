//! Unsigned transaction building and hashing.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::consensus::SignableTransaction;

use crate::payload::gas;
use crate::payload::types::{PayloadError, PendingTransaction, TransactionIntent, UnsignedPayload};
use crate::rpc::registry::ChainRegistry;
use crate::session::store::SessionStore;

/// Fixed gas limit for the engine's transfer payloads.
pub const GAS_LIMIT: u64 = 50_000;

/// Builds, hashes, and persists unsigned EIP-1559 transactions.
pub struct PayloadBuilder<'a> {
    registry: &'a ChainRegistry,
    store: &'a SessionStore,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(registry: &'a ChainRegistry, store: &'a SessionStore) -> Self {
        Self { registry, store }
    }

    /// Quote gas for a chain without building anything.
    pub async fn quote_gas(&self, chain_id: crate::rpc::ChainId) -> Result<gas::GasQuote, PayloadError> {
        let client = self.require_chain(chain_id)?;
        gas::quote_gas(client).await
    }

    /// Build the unsigned transaction for an intent.
    ///
    /// The serialized transaction is persisted to the session store before
    /// this returns, so an interruption after this point can always resume.
    pub async fn build_transaction(
        &self,
        intent: &TransactionIntent,
    ) -> Result<UnsignedPayload, PayloadError> {
        let client = self.require_chain(intent.chain_id)?;

        let nonce = client
            .get_transaction_count(intent.sender)
            .await
            .map_err(|e| PayloadError::NonceFetch(e.to_string()))?;
        let quote = gas::quote_gas(client).await?;

        let (to, value, input) = intent.call.parts();
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let pending = PendingTransaction {
            intent_id: intent.intent_id,
            chain_id: intent.chain_id.0,
            sender: intent.sender,
            derivation_path: intent.derivation_path.clone(),
            stealth_recipient: intent.stealth_recipient,
            nonce,
            gas_limit: GAS_LIMIT,
            max_fee_per_gas: quote.max_fee_per_gas,
            max_priority_fee_per_gas: quote.max_priority_fee_per_gas,
            to,
            value,
            input,
            created_at,
        };
        let signing_hash = pending.to_typed().signature_hash();

        // Durability point: after this write the flow survives a restart.
        self.store.put(&pending)?;

        tracing::info!(
            intent_id = %intent.intent_id,
            chain_id = intent.chain_id.0,
            sender = %intent.sender,
            nonce,
            signing_hash = %signing_hash,
            "Unsigned transaction built and persisted"
        );

        Ok(UnsignedPayload {
            pending,
            signing_hash,
        })
    }

    fn require_chain(
        &self,
        chain_id: crate::rpc::ChainId,
    ) -> Result<&'a crate::rpc::ChainClient, PayloadError> {
        self.registry
            .get(chain_id)
            .ok_or_else(|| PayloadError::UnsupportedChain {
                chain_id: chain_id.0,
                reason: "chain is not configured".to_string(),
            })
    }
}
