//! The resumable signing session state machine.

use std::sync::Arc;

use alloy::consensus::SignableTransaction;
use alloy::primitives::B256;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::assemble::{self, AssembleError, SignedTransaction};
use crate::mpc::client::SignerService;
use crate::mpc::types::{MpcError, SignRequest, SignatureResponse};
use crate::observability::metrics;
use crate::payload::builder::PayloadBuilder;
use crate::payload::types::{PayloadError, PendingTransaction, TransactionIntent};
use crate::relay::{Relay, RelayError};
use crate::rpc::types::ChainId;
use crate::session::store::{SessionStore, StoreError};

/// Session lifecycle states.
///
/// `Failed` is reachable from any non-terminal state; `Relayed` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    PayloadReady,
    AwaitingSignature,
    SignatureReceived,
    Relayed,
    Failed,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::PayloadReady => "payload_ready",
            SessionState::AwaitingSignature => "awaiting_signature",
            SessionState::SignatureReceived => "signature_received",
            SessionState::Relayed => "relayed",
            SessionState::Failed => "failed",
        }
    }
}

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A signing submission is already in flight for this intent.
    #[error("Signing already in progress for intent {0}")]
    Conflict(Uuid),

    /// The operation is not legal in the current state.
    #[error("Cannot {op} in state {state:?}")]
    InvalidState {
        op: &'static str,
        state: SessionState,
    },

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Signer(#[from] MpcError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-intent submission locks, shared across sessions in one process.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<DashMap<Uuid, ()>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for an intent; false if it is already held.
    pub fn try_acquire(&self, intent_id: Uuid) -> bool {
        match self.inner.entry(intent_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(());
                true
            }
        }
    }

    pub fn release(&self, intent_id: Uuid) {
        self.inner.remove(&intent_id);
    }
}

/// One signing flow from intent to relay, crash-consistent via the store.
pub struct SigningSession<'a> {
    store: &'a SessionStore,
    locks: &'a SessionLocks,
    state: SessionState,
    pending: Option<PendingTransaction>,
    shares: Option<SignatureResponse>,
    signed: Option<SignedTransaction>,
}

impl<'a> SigningSession<'a> {
    /// A fresh idle session.
    pub fn new(store: &'a SessionStore, locks: &'a SessionLocks) -> Self {
        Self {
            store,
            locks,
            state: SessionState::Idle,
            pending: None,
            shares: None,
            signed: None,
        }
    }

    /// Reconstruct a session after a process or page restart.
    ///
    /// The outcome is a pure function of (persisted entry, inbound
    /// completion reference):
    /// - neither present → no-op, the session stays `Idle`;
    /// - entry + reference → fetch the finished shares by reference and
    ///   land in `SignatureReceived` without resubmitting;
    /// - entry only → `PayloadReady`; the payload can be resubmitted
    ///   (signing has no chain side effect) or abandoned.
    pub async fn resume(
        store: &'a SessionStore,
        locks: &'a SessionLocks,
        chain_id: ChainId,
        completion_reference: Option<&str>,
        signer: &dyn SignerService,
    ) -> Result<SigningSession<'a>, SessionError> {
        let mut session = Self::new(store, locks);

        let Some(pending) = store.pending_for_chain(chain_id.0).into_iter().next() else {
            if let Some(reference) = completion_reference {
                tracing::warn!(
                    reference,
                    chain_id = chain_id.0,
                    "Completion reference without a persisted transaction; ignoring"
                );
            }
            return Ok(session);
        };

        tracing::info!(
            intent_id = %pending.intent_id,
            chain_id = chain_id.0,
            path = %pending.derivation_path,
            "Recovered persisted transaction"
        );
        session.pending = Some(pending);

        match completion_reference {
            Some(reference) => {
                let shares = signer.fetch_result(reference).await?;
                session.shares = Some(shares);
                session.transition(SessionState::SignatureReceived);
            }
            None => session.transition(SessionState::PayloadReady),
        }
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pending(&self) -> Option<&PendingTransaction> {
        self.pending.as_ref()
    }

    /// Build and persist the unsigned transaction for an intent.
    pub async fn prepare(
        &mut self,
        builder: &PayloadBuilder<'_>,
        intent: &TransactionIntent,
    ) -> Result<B256, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::InvalidState {
                op: "prepare",
                state: self.state,
            });
        }

        let payload = builder.build_transaction(intent).await?;
        self.pending = Some(payload.pending);
        self.transition(SessionState::PayloadReady);
        Ok(payload.signing_hash)
    }

    /// Submit the signing request and wait for shares (in-process path).
    ///
    /// The per-intent lock is held for the duration of the round trip;
    /// a second submission for the same intent fails with `Conflict`.
    /// There is no client-side timeout: the remote approval may take
    /// arbitrarily long.
    pub async fn request_signature(
        &mut self,
        signer: &dyn SignerService,
        key_version: u32,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::PayloadReady {
            return Err(SessionError::InvalidState {
                op: "request signature",
                state: self.state,
            });
        }
        let Some(pending) = self.pending.as_ref() else {
            return Err(SessionError::InvalidState {
                op: "request signature",
                state: self.state,
            });
        };
        let intent_id = pending.intent_id;

        if !self.locks.try_acquire(intent_id) {
            return Err(SessionError::Conflict(intent_id));
        }

        let request = SignRequest {
            payload: pending.to_typed().signature_hash().0,
            path: pending.derivation_path.clone(),
            key_version,
        };
        metrics::record_sign_request(pending.chain_id);
        self.transition(SessionState::AwaitingSignature);

        let result = signer.sign(&request).await;
        self.locks.release(intent_id);

        match result {
            Ok(shares) => {
                self.shares = Some(shares);
                self.transition(SessionState::SignatureReceived);
                Ok(())
            }
            Err(e) => {
                self.transition(SessionState::Failed);
                Err(e.into())
            }
        }
    }

    /// Reattach and validate the signature shares.
    ///
    /// A failure is terminal: the shares are spent and a fresh session is
    /// required.
    pub fn assemble(&mut self) -> Result<&SignedTransaction, SessionError> {
        if self.state != SessionState::SignatureReceived {
            return Err(SessionError::InvalidState {
                op: "assemble",
                state: self.state,
            });
        }
        let (Some(pending), Some(shares)) = (self.pending.as_ref(), self.shares.take()) else {
            return Err(SessionError::InvalidState {
                op: "assemble",
                state: self.state,
            });
        };

        match assemble::assemble(pending, &shares) {
            Ok(signed) => Ok(self.signed.insert(signed)),
            Err(e) => {
                self.transition(SessionState::Failed);
                Err(e.into())
            }
        }
    }

    /// Broadcast the assembled transaction and clear the durable entry.
    ///
    /// An `Unreachable` failure leaves the session intact so the caller
    /// can retry with the identical signed bytes; a rejection is fatal.
    pub async fn relay(&mut self, relay: &Relay<'_>) -> Result<B256, SessionError> {
        let Some(signed) = self.signed.as_ref() else {
            return Err(SessionError::InvalidState {
                op: "relay",
                state: self.state,
            });
        };

        match relay.broadcast(signed).await {
            Ok(tx_hash) => {
                if let Some(pending) = self.pending.take() {
                    self.store.remove(pending.chain_id, pending.intent_id)?;
                }
                self.transition(SessionState::Relayed);
                Ok(tx_hash)
            }
            Err(e) if e.is_retryable() => Err(e.into()),
            Err(e) => {
                self.transition(SessionState::Failed);
                Err(e.into())
            }
        }
    }

    /// Discard the flow: clear the durable entry and return to `Idle`.
    ///
    /// Safe at any point before relay, because nothing has touched the
    /// chain yet.
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        if let Some(pending) = self.pending.take() {
            self.locks.release(pending.intent_id);
            self.store.remove(pending.chain_id, pending.intent_id)?;
            tracing::info!(intent_id = %pending.intent_id, "Session abandoned");
        }
        self.shares = None;
        self.signed = None;
        self.transition(SessionState::Idle);
        Ok(())
    }

    fn transition(&mut self, to: SessionState) {
        tracing::debug!(from = self.state.name(), to = to.name(), "Session transition");
        metrics::record_session_transition(to.name());
        self.state = to;
    }
}
