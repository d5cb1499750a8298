use std::time::Duration;

use async_trait::async_trait;
use mintline_crypto::Signature;
use mintline_ledger::{
    AccountRecord, BundleStatus, ConfirmationPolicy, LedgerConnection, LedgerResult, SignedBundle,
};
use mintline_types::{Address, Blockhash, Lamports};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::endpoint::{endpoints, HealthResponse};
use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{
    AccountResponse, AirdropRequest, AirdropResponse, BlockhashResponse, BundleStatusResponse,
    ErrorResponse, RentResponse, SubmitBundleRequest, SubmitBundleResponse,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`LedgerConnection`] to a remote Mintline node over JSON/HTTP.
///
/// Connection failures surface as `NetworkUnavailable`; rejections reported
/// by the node surface as `Rejected` with the node's reason.
#[derive(Clone, Debug)]
pub struct HttpConnection {
    base_url: String,
    client: reqwest::Client,
    policy: ConfirmationPolicy,
}

impl HttpConnection {
    /// Build a connection to `endpoint` (an `http://` or `https://` URL).
    /// No request is made until the first call.
    pub fn new(endpoint: &str) -> ProtocolResult<Self> {
        let trimmed = endpoint.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ProtocolError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "expected an http:// or https:// URL".into(),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProtocolError::Client(e.to_string()))?;
        Ok(Self {
            base_url: trimmed.to_string(),
            client,
            policy: ConfirmationPolicy::default(),
        })
    }

    pub fn with_confirmation_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> ProtocolResult<HealthResponse> {
        self.get_json(endpoints::HEALTH).await
    }

    /// Ask the node's faucet to credit `lamports` to `address`.
    /// Returns the new balance.
    pub async fn airdrop(&self, address: &Address, lamports: Lamports) -> ProtocolResult<Lamports> {
        let response: AirdropResponse = self
            .post_json(
                endpoints::AIRDROP,
                &AirdropRequest {
                    address: *address,
                    lamports,
                },
            )
            .await?;
        Ok(response.balance)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ProtocolResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::read_response(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ProtocolResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::read_response(response).await
    }

    async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> ProtocolResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let code = status.as_u16();
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => Err(ProtocolError::Remote {
                code: body.code,
                message: body.message,
                reason: body.reason,
            }),
            Err(_) => Err(ProtocolError::Remote {
                code,
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
                reason: None,
            }),
        }
    }
}

#[async_trait]
impl LedgerConnection for HttpConnection {
    async fn latest_blockhash(&self) -> LedgerResult<Blockhash> {
        let response: BlockhashResponse = self.get_json(endpoints::BLOCKHASH).await?;
        Ok(response.blockhash)
    }

    async fn send_bundle(&self, bundle: &SignedBundle) -> LedgerResult<Signature> {
        let response: SubmitBundleResponse = self
            .post_json(
                endpoints::BUNDLES,
                &SubmitBundleRequest {
                    bundle: bundle.clone(),
                },
            )
            .await?;
        Ok(response.signature)
    }

    async fn bundle_status(&self, signature: &Signature) -> LedgerResult<Option<BundleStatus>> {
        let response: BundleStatusResponse =
            self.get_json(&endpoints::bundle_status(signature)).await?;
        Ok(response.status)
    }

    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> LedgerResult<Lamports> {
        let response: RentResponse = self.get_json(&endpoints::rent(space)).await?;
        Ok(response.lamports)
    }

    async fn account(&self, address: &Address) -> LedgerResult<Option<AccountRecord>> {
        let response: AccountResponse = self.get_json(&endpoints::account(address)).await?;
        Ok(response.account)
    }

    fn confirmation_policy(&self) -> ConfirmationPolicy {
        self.policy
    }
}
