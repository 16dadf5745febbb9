//! Shared utilities for integration testing: a mock JSON-RPC node and a
//! local signer standing in for the remote threshold service.

use std::sync::Mutex;

use alloy::primitives::{keccak256, Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use stealthpay_core::config::{ChainConfig, EngineConfig};
use stealthpay_core::mpc::{MpcError, SignRequest, SignatureResponse, SignerService};

/// Anvil's first well-known development key.
pub const SENDER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Canned chain state served by the mock node.
#[derive(Clone, Copy)]
pub struct MockNode {
    pub base_fee: u128,
    pub gas_price: u128,
    pub priority_fee: u128,
    pub nonce: u64,
    pub reject_broadcast: bool,
}

impl Default for MockNode {
    fn default() -> Self {
        Self {
            base_fee: 1_000_000_000,
            gas_price: 900_000_000,
            priority_fee: 2_000_000,
            nonce: 7,
            reject_broadcast: false,
        }
    }
}

/// Start a mock JSON-RPC node and return its HTTP URL.
pub async fn start_mock_node(node: MockNode) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let body = read_body(&mut socket).await;
                        let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
                        let response = dispatch(&node, &request).to_string();
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    format!("http://{addr}")
}

/// An endpoint nothing listens on; connections are refused immediately.
#[allow(dead_code)]
pub async fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn read_body(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + length {
                return String::from_utf8_lossy(&buf[pos + 4..pos + 4 + length]).to_string();
            }
        }
    }
    String::new()
}

fn dispatch(node: &MockNode, request: &Value) -> Value {
    let id = request["id"].clone();
    let result = match request["method"].as_str().unwrap_or_default() {
        "eth_chainId" => json!("0x7a69"),
        "eth_getBlockByNumber" => latest_block(node.base_fee),
        "eth_gasPrice" => json!(format!("{:#x}", node.gas_price)),
        "eth_maxPriorityFeePerGas" => json!(format!("{:#x}", node.priority_fee)),
        "eth_getTransactionCount" => json!(format!("{:#x}", node.nonce)),
        "eth_sendRawTransaction" => {
            if node.reject_broadcast {
                return json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {"code": -32000, "message": "nonce too low"}
                });
            }
            let raw = request["params"][0].as_str().unwrap_or_default();
            let bytes = alloy::hex::decode(raw).unwrap_or_default();
            json!(format!("{}", keccak256(&bytes)))
        }
        _ => Value::Null,
    };
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn latest_block(base_fee: u128) -> Value {
    json!({
        "hash": format!("0x{}", "11".repeat(32)),
        "parentHash": format!("0x{}", "22".repeat(32)),
        "sha3Uncles": format!("0x{}", "33".repeat(32)),
        "miner": "0x0000000000000000000000000000000000000000",
        "stateRoot": format!("0x{}", "44".repeat(32)),
        "transactionsRoot": format!("0x{}", "55".repeat(32)),
        "receiptsRoot": format!("0x{}", "66".repeat(32)),
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "difficulty": "0x0",
        "number": "0x10",
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x5208",
        "timestamp": "0x68b0f000",
        "extraData": "0x",
        "mixHash": format!("0x{}", "00".repeat(32)),
        "nonce": "0x0000000000000000",
        "baseFeePerGas": format!("{base_fee:#x}"),
        "totalDifficulty": "0x0",
        "size": "0x220",
        "uncles": [],
        "transactions": []
    })
}

/// One configured chain pointing at the given endpoint, everything else
/// defaulted.
pub fn single_chain_config(rpc_url: &str) -> EngineConfig {
    EngineConfig {
        chains: vec![ChainConfig {
            name: "anvil".to_string(),
            chain_id: 31337,
            rpc_url: rpc_url.to_string(),
            rpc_timeout_secs: 2,
            ..ChainConfig::default()
        }],
        ..EngineConfig::default()
    }
}

/// Signs locally with a dev key but speaks the remote signer's wire shapes,
/// including result retrieval by completion reference.
pub struct LocalSigner {
    signer: PrivateKeySigner,
    completed: Mutex<Option<SignatureResponse>>,
}

impl LocalSigner {
    pub fn new() -> Self {
        Self {
            signer: SENDER_KEY.parse().unwrap(),
            completed: Mutex::new(None),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl SignerService for LocalSigner {
    async fn sign(&self, request: &SignRequest) -> Result<SignatureResponse, MpcError> {
        let hash = B256::from(request.payload);
        let signature = self
            .signer
            .sign_hash_sync(&hash)
            .map_err(|e| MpcError::Service(e.to_string()))?;

        let response = SignatureResponse::from_parts(
            &format!("02{}", alloy::hex::encode(signature.r().to_be_bytes::<32>())),
            &alloy::hex::encode(signature.s().to_be_bytes::<32>()),
            signature.v() as u8,
        );
        *self.completed.lock().unwrap() = Some(response.clone());
        Ok(response)
    }

    async fn fetch_result(&self, _reference: &str) -> Result<SignatureResponse, MpcError> {
        self.completed
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| MpcError::Service("no completed signing request".to_string()))
    }
}
