//! Transaction intent and pending transaction types.

use alloy::consensus::TxEip1559;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::rpc::contracts::ContractCall;
use crate::rpc::types::ChainId;
use crate::session::store::StoreError;

/// Errors that can occur while building a payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The chain is not configured or lacks EIP-1559 fee fields.
    #[error("Chain {chain_id} is not supported: {reason}")]
    UnsupportedChain { chain_id: u64, reason: String },

    /// The sender's nonce could not be fetched.
    #[error("Nonce fetch failed: {0}")]
    NonceFetch(String),

    /// Another chain read failed.
    #[error(transparent)]
    Rpc(#[from] crate::rpc::types::RpcError),

    /// The pending transaction could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the transaction transfers: a closed set of typed commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransferCall {
    /// Native token transfer.
    Native { to: Address, value: U256 },
    /// ERC-20 `transfer` to a recipient.
    Erc20Transfer {
        token: Address,
        to: Address,
        amount: U256,
    },
}

impl TransferCall {
    /// Resolve to the transaction's (to, value, call data) triple.
    pub fn parts(&self) -> (Address, U256, Bytes) {
        match self {
            TransferCall::Native { to, value } => (*to, *value, Bytes::new()),
            TransferCall::Erc20Transfer { token, to, amount } => {
                let call = ContractCall::Erc20Transfer {
                    token: *token,
                    to: *to,
                    amount: *amount,
                };
                (*token, U256::ZERO, call.encode())
            }
        }
    }
}

/// A user's request to move value, owned by exactly one signing session.
#[derive(Debug, Clone)]
pub struct TransactionIntent {
    /// Unique intent identifier; also the session lock and store key.
    pub intent_id: Uuid,
    /// Target chain.
    pub chain_id: ChainId,
    /// Derived sender address (must match the derivation path's key).
    pub sender: Address,
    /// Derivation path the remote signer will sign under.
    pub derivation_path: String,
    /// What to transfer.
    pub call: TransferCall,
    /// Stealth recipient this intent pays, if any.
    pub stealth_recipient: Option<Address>,
}

impl TransactionIntent {
    /// A fresh intent with a random identifier.
    pub fn new(
        chain_id: ChainId,
        sender: Address,
        derivation_path: impl Into<String>,
        call: TransferCall,
    ) -> Self {
        Self {
            intent_id: Uuid::new_v4(),
            chain_id,
            sender,
            derivation_path: derivation_path.into(),
            call,
            stealth_recipient: None,
        }
    }

    /// Mark the intent as paying a stealth recipient.
    pub fn with_stealth_recipient(mut self, recipient: Address) -> Self {
        self.stealth_recipient = Some(recipient);
        self
    }
}

/// The durable unsigned transaction, keyed by (chain, intent).
///
/// This is the one piece of state that must survive a process or page
/// restart: everything needed to resume, re-derive the signing hash, and
/// reattach a signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub intent_id: Uuid,
    pub chain_id: u64,
    pub sender: Address,
    pub derivation_path: String,
    pub stealth_recipient: Option<Address>,
    pub nonce: u64,
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
    /// Seconds since epoch, for display and housekeeping only.
    pub created_at: u64,
}

impl PendingTransaction {
    /// Rebuild the typed transaction these fields were serialized from.
    pub fn to_typed(&self) -> TxEip1559 {
        TxEip1559 {
            chain_id: self.chain_id,
            nonce: self.nonce,
            gas_limit: self.gas_limit,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            to: TxKind::Call(self.to),
            value: self.value,
            access_list: Default::default(),
            input: self.input.clone(),
        }
    }

    /// The store key for this transaction.
    pub fn store_key(&self) -> String {
        format!("{}:{}", self.chain_id, self.intent_id)
    }
}

/// Result of a successful payload build.
#[derive(Debug, Clone)]
pub struct UnsignedPayload {
    /// The persisted unsigned transaction.
    pub pending: PendingTransaction,
    /// Keccak hash of the typed-envelope signing encoding.
    pub signing_hash: alloy::primitives::B256,
}
