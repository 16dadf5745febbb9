//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the signing engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// SEC1-encoded root public key shared by all accounts (hex).
    pub root_public_key: String,

    /// Supported chain definitions; one RPC client is built per entry.
    pub chains: Vec<ChainConfig>,

    /// Remote threshold-signer settings.
    pub mpc: MpcConfig,

    /// Durable session store settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Per-chain RPC and contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Human-readable chain name for logging (e.g., "eth-sepolia").
    pub name: String,

    /// EIP-155 chain id.
    pub chain_id: u64,

    /// Primary JSON-RPC endpoint.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoints, tried in order.
    pub failover_urls: Vec<String>,

    /// Per-request RPC timeout.
    pub rpc_timeout_secs: u64,

    /// Fixed buffer added on top of max(base fee, gas price), in wei.
    pub fee_buffer_wei: u128,

    /// Stablecoin contract used for typed token transfers (hex address).
    pub usdc: Option<String>,

    /// ERC-6538 stealth meta-address registry (hex address).
    pub stealth_registry: Option<String>,

    /// ERC-5564 announcer contract (hex address).
    pub stealth_announcer: Option<String>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            chain_id: 0,
            rpc_url: String::new(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            fee_buffer_wei: 2_000_000_000,
            usdc: None,
            stealth_registry: None,
            stealth_announcer: None,
        }
    }
}

/// Remote threshold-signer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MpcConfig {
    /// HTTP endpoint of the signing service.
    pub endpoint: String,

    /// On-chain account of the signer contract, included in requests.
    pub contract_id: String,

    /// Key version to request signatures against.
    pub key_version: u32,
}

impl Default for MpcConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            contract_id: String::new(),
            key_version: 0,
        }
    }
}

/// Durable session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON store file. Must survive process restarts.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "stealthpay-sessions.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter (overridden by `RUST_LOG`).
    pub log_level: String,

    /// Emit JSON-formatted logs (production) instead of pretty ones.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
