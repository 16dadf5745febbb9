//! Signature reassembly and validation.
//!
//! Takes the signature shares returned by the remote signer plus the
//! persisted unsigned transaction, reattaches the signature, and verifies
//! that the recovered signer is the expected sender. Any failure here is
//! terminal for the session: the caller must start a fresh signing session
//! and must never retry assembly with the same shares.

use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Bytes, B256};
use thiserror::Error;

use crate::mpc::types::SignatureResponse;
use crate::payload::types::PendingTransaction;

/// Errors raised by signature assembly. Terminal for the session.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("Signature invalid: {0}")]
    SignatureInvalid(String),
}

/// A fully signed transaction, ready for broadcast and nothing else.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// Chain the transaction is bound to.
    pub chain_id: u64,
    /// Hash the network will know the transaction by.
    pub tx_hash: B256,
    /// EIP-2718 encoded bytes; broadcast is idempotent on these.
    pub raw: Bytes,
}

/// Reattach signature shares to the pending transaction and validate.
pub fn assemble(
    pending: &PendingTransaction,
    shares: &SignatureResponse,
) -> Result<SignedTransaction, AssembleError> {
    let tx = pending.to_typed();
    let signing_hash = tx.signature_hash();

    let signature = shares
        .to_signature()
        .map_err(|e| AssembleError::SignatureInvalid(e.to_string()))?;

    let recovered = signature
        .recover_address_from_prehash(&signing_hash)
        .map_err(|e| AssembleError::SignatureInvalid(format!("recovery failed: {e}")))?;
    if recovered != pending.sender {
        return Err(AssembleError::SignatureInvalid(format!(
            "recovered signer {recovered} does not match expected sender {}",
            pending.sender
        )));
    }

    let envelope = TxEnvelope::Eip1559(tx.into_signed(signature));
    let tx_hash = *envelope.tx_hash();
    let raw = Bytes::from(envelope.encoded_2718());

    tracing::info!(
        intent_id = %pending.intent_id,
        chain_id = pending.chain_id,
        tx_hash = %tx_hash,
        "Signed transaction assembled and verified"
    );

    Ok(SignedTransaction {
        chain_id: pending.chain_id,
        tx_hash,
        raw,
    })
}
