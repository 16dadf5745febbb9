//! Explicit per-chain client registry.
//!
//! Built once from configuration and passed by reference into the
//! components that need chain access. There is no ambient global.

use std::collections::HashMap;

use crate::config::schema::EngineConfig;
use crate::rpc::client::ChainClient;
use crate::rpc::types::{ChainId, RpcResult};

/// Immutable map of chain id to RPC client.
#[derive(Debug)]
pub struct ChainRegistry {
    clients: HashMap<u64, ChainClient>,
}

impl ChainRegistry {
    /// Build one client per configured chain.
    pub fn from_config(config: &EngineConfig) -> RpcResult<Self> {
        let mut clients = HashMap::with_capacity(config.chains.len());
        for chain in &config.chains {
            clients.insert(chain.chain_id, ChainClient::new(chain.clone())?);
        }
        Ok(Self { clients })
    }

    /// Look up the client for a chain id.
    pub fn get(&self, chain_id: ChainId) -> Option<&ChainClient> {
        self.clients.get(&chain_id.0)
    }

    /// Number of configured chains.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
