//! Chain RPC client with failover, timeouts, and error handling.
//!
//! # Responsibilities
//! - Connect to one or more JSON-RPC endpoints per chain
//! - Query fee state, nonces, balances, and stealth contracts
//! - Handle timeouts and network errors gracefully, trying the next provider

use std::sync::Arc;
use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, TransactionRequest};
use alloy::sol_types::{SolCall, SolEvent};
use tokio::time::timeout;

use crate::config::schema::ChainConfig;
use crate::rpc::contracts::{ContractCall, IERC20, IERC5564Announcer};
use crate::rpc::types::{ChainId, RpcError, RpcResult};
use crate::stealth::types::Announcement;

/// RPC client for a single chain, with primary + failover providers.
#[derive(Clone)]
pub struct ChainClient {
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a client from a chain configuration.
    pub fn new(config: ChainConfig) -> RpcResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| RpcError::InvalidUrl(config.rpc_url.clone(), e.to_string()))?;
        providers.push(
            Arc::new(ProviderBuilder::new().connect_http(primary_url))
                as Arc<dyn Provider + Send + Sync>,
        );

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url))
                    as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::info!(
            chain = %config.name,
            chain_id = config.chain_id,
            providers = providers.len(),
            "Chain client initialized"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// The configured chain id.
    pub fn chain_id(&self) -> ChainId {
        ChainId(self.config.chain_id)
    }

    /// The chain configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub(crate) fn providers(&self) -> &[Arc<dyn Provider + Send + Sync>] {
        &self.providers
    }

    pub(crate) fn timeout_duration(&self) -> Duration {
        self.timeout_duration
    }

    /// Base fee of the latest block, or `None` for pre-EIP-1559 chains.
    pub async fn get_base_fee(&self) -> RpcResult<Option<u128>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_by_number(BlockNumberOrTag::Latest);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(Some(block))) => {
                    return Ok(block.header.base_fee_per_gas.map(u128::from));
                }
                Ok(Ok(None)) => {
                    tracing::warn!(provider_idx = i, "Latest block missing, trying next provider");
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(RpcError::Rpc("All providers failed to get latest block".to_string()))
    }

    /// Node-suggested gas price in wei.
    pub async fn get_gas_price(&self) -> RpcResult<u128> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_gas_price();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(RpcError::Rpc("All providers failed to get gas price".to_string()))
    }

    /// Node-suggested priority fee in wei.
    pub async fn get_max_priority_fee(&self) -> RpcResult<u128> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_max_priority_fee_per_gas();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(RpcError::Rpc("All providers failed to get priority fee".to_string()))
    }

    /// Current transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> RpcResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_count(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(RpcError::Rpc("All providers failed to get transaction count".to_string()))
    }

    /// Native token balance of an address.
    pub async fn get_balance(&self, address: Address) -> RpcResult<U256> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_balance(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(RpcError::Rpc("All providers failed to get balance".to_string()))
    }

    /// Execute a typed view call and return the raw response bytes.
    pub async fn call(&self, call: &ContractCall) -> RpcResult<Bytes> {
        let request = TransactionRequest::default()
            .with_to(call.target())
            .with_input(call.encode());

        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.call(request.clone());
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(RpcError::Rpc("All providers failed to execute call".to_string()))
    }

    /// Balance of the configured stablecoin for an owner.
    pub async fn erc20_balance(&self, owner: Address) -> RpcResult<U256> {
        let token = self.contract_address(self.config.usdc.as_deref(), "usdc")?;
        let response = self
            .call(&ContractCall::Erc20BalanceOf { token, owner })
            .await?;
        IERC20::balanceOfCall::abi_decode_returns(&response)
            .map_err(|e| RpcError::Decode(e.to_string()))
    }

    /// Read a registrant's stealth meta-address from the ERC-6538 registry.
    ///
    /// Returns the raw 66-byte meta-address payload; empty bytes mean the
    /// registrant never registered for this scheme.
    pub async fn stealth_meta_address(
        &self,
        registrant: Address,
        scheme_id: u64,
    ) -> RpcResult<Bytes> {
        let registry =
            self.contract_address(self.config.stealth_registry.as_deref(), "stealth_registry")?;
        let response = self
            .call(&ContractCall::StealthMetaAddressOf {
                registry,
                registrant,
                scheme_id,
            })
            .await?;
        crate::rpc::contracts::IERC6538Registry::stealthMetaAddressOfCall::abi_decode_returns(
            &response,
        )
        .map_err(|e| RpcError::Decode(e.to_string()))
    }

    /// Fetch stealth announcements from the configured announcer's logs.
    pub async fn fetch_announcements(
        &self,
        from_block: u64,
        to_block: Option<u64>,
    ) -> RpcResult<Vec<Announcement>> {
        let announcer =
            self.contract_address(self.config.stealth_announcer.as_deref(), "stealth_announcer")?;

        let mut filter = Filter::new()
            .address(announcer)
            .event_signature(IERC5564Announcer::Announcement::SIGNATURE_HASH)
            .from_block(from_block);
        if let Some(to) = to_block {
            filter = filter.to_block(to);
        }

        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_logs(&filter);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(logs)) => {
                    let mut announcements = Vec::with_capacity(logs.len());
                    for log in &logs {
                        match IERC5564Announcer::Announcement::decode_log_data(log.data()) {
                            Ok(event) => announcements.push(Announcement {
                                scheme_id: event.schemeId.try_into().unwrap_or(u64::MAX),
                                stealth_address: event.stealthAddress,
                                ephemeral_public_key: event.ephemeralPubKey.clone(),
                                // View tag is the first metadata byte.
                                view_tag: event.metadata.first().copied().unwrap_or(0),
                            }),
                            Err(e) => {
                                tracing::debug!(error = %e, "Skipping undecodable announcement log");
                            }
                        }
                    }
                    return Ok(announcements);
                }
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(RpcError::Rpc("All providers failed to fetch announcements".to_string()))
    }

    fn contract_address(
        &self,
        configured: Option<&str>,
        what: &'static str,
    ) -> RpcResult<Address> {
        let raw = configured.ok_or(RpcError::MissingContract(what, self.config.chain_id))?;
        raw.parse().map_err(|_| RpcError::Decode(format!("bad {what} address '{raw}'")))
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("name", &self.config.name)
            .field("chain_id", &self.config.chain_id)
            .field("providers", &self.providers.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
