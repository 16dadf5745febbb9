//! HTTP client for the remote signing service.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::schema::MpcConfig;
use crate::mpc::types::{MpcError, SignRequest, SignatureResponse, SIGN_DEPOSIT_YOCTO, SIGN_GAS};

/// The signing service seam.
///
/// `sign` is the in-process path; `fetch_result` serves the interrupted
/// path, where an external approval step completed the request and left a
/// completion reference behind.
#[async_trait]
pub trait SignerService: Send + Sync {
    async fn sign(&self, request: &SignRequest) -> Result<SignatureResponse, MpcError>;

    async fn fetch_result(&self, reference: &str) -> Result<SignatureResponse, MpcError>;
}

#[derive(Serialize)]
struct SignEnvelope<'a> {
    contract_id: &'a str,
    request: &'a SignRequest,
    gas: u64,
    deposit: &'a str,
}

/// Signer client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSignerClient {
    http: reqwest::Client,
    endpoint: String,
    contract_id: String,
}

impl HttpSignerClient {
    pub fn new(config: &MpcConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            contract_id: config.contract_id.clone(),
        }
    }

    async fn decode(response: reqwest::Response) -> Result<SignatureResponse, MpcError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MpcError::Service(format!("{status}: {body}")));
        }
        response
            .json::<SignatureResponse>()
            .await
            .map_err(|e| MpcError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl SignerService for HttpSignerClient {
    async fn sign(&self, request: &SignRequest) -> Result<SignatureResponse, MpcError> {
        let envelope = SignEnvelope {
            contract_id: &self.contract_id,
            request,
            gas: SIGN_GAS,
            deposit: SIGN_DEPOSIT_YOCTO,
        };
        tracing::info!(
            contract_id = %self.contract_id,
            path = %request.path,
            "Requesting signature from remote signer; this might take a while"
        );
        let response = self
            .http
            .post(format!("{}/sign", self.endpoint))
            .json(&envelope)
            .send()
            .await
            .map_err(|e| MpcError::Http(e.to_string()))?;
        Self::decode(response).await
    }

    async fn fetch_result(&self, reference: &str) -> Result<SignatureResponse, MpcError> {
        tracing::info!(reference, "Fetching completed signature shares");
        let response = self
            .http
            .get(format!("{}/result/{reference}", self.endpoint))
            .send()
            .await
            .map_err(|e| MpcError::Http(e.to_string()))?;
        Self::decode(response).await
    }
}
