//! Metrics collection.
//!
//! # Metrics
//! - `signer_sign_requests_total` (counter): signing requests by chain
//! - `signer_session_transitions_total` (counter): state machine transitions
//! - `signer_relays_total` (counter): broadcasts by chain and outcome
//! - `signer_announcements_scanned_total` / `signer_announcements_matched_total`
//!
//! # Design Decisions
//! - Low-overhead counter increments, labelled where the cardinality is bounded
//! - No recorder is installed here; `metrics` macros no-op without one

use metrics::counter;

/// Record a signing request submitted to the remote signer.
pub fn record_sign_request(chain_id: u64) {
    counter!("signer_sign_requests_total", "chain_id" => chain_id.to_string()).increment(1);
}

/// Record a session state transition.
pub fn record_session_transition(state: &'static str) {
    counter!("signer_session_transitions_total", "state" => state).increment(1);
}

/// Record a relay attempt outcome: "accepted", "rejected", or "unreachable".
pub fn record_relay(chain_id: u64, outcome: &'static str) {
    counter!(
        "signer_relays_total",
        "chain_id" => chain_id.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record an announcement scan pass.
pub fn record_scan(scanned: usize, matched: usize) {
    counter!("signer_announcements_scanned_total").increment(scanned as u64);
    counter!("signer_announcements_matched_total").increment(matched as u64);
}
