use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use mintline_crypto::Signature;
use mintline_ledger::{InMemoryLedger, LedgerConnection, LedgerError};
use mintline_protocol::{
    AccountResponse, AirdropRequest, AirdropResponse, BlockhashResponse, BundleStatusResponse,
    HealthResponse, RentResponse, SubmitBundleRequest, SubmitBundleResponse,
};
use mintline_types::Address;

use crate::config::NodeConfig;
use crate::error::{ServerError, ServerResult};

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<InMemoryLedger>,
    pub config: Arc<NodeConfig>,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn blockhash_handler(
    State(state): State<AppState>,
) -> ServerResult<Json<BlockhashResponse>> {
    let blockhash = state.ledger.latest_blockhash().await?;
    let slot = state.ledger.slot()?;
    Ok(Json(BlockhashResponse { blockhash, slot }))
}

pub async fn rent_handler(
    State(state): State<AppState>,
    Path(space): Path<usize>,
) -> ServerResult<Json<RentResponse>> {
    let lamports = state
        .ledger
        .minimum_balance_for_rent_exemption(space)
        .await
        .map_err(|e| match e {
            LedgerError::Rejected(reason) => ServerError::BadRequest(reason.to_string()),
            other => other.into(),
        })?;
    Ok(Json(RentResponse { space, lamports }))
}

pub async fn account_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ServerResult<Json<AccountResponse>> {
    let address = Address::from_hex(&address)
        .map_err(|e| ServerError::BadRequest(format!("invalid address: {e}")))?;
    let account = state.ledger.account(&address).await?;
    Ok(Json(AccountResponse { address, account }))
}

/// Process a signed bundle. Bundles the ledger rejects still return their
/// signature; the rejection is read back through the status endpoint.
pub async fn submit_bundle_handler(
    State(state): State<AppState>,
    Json(request): Json<SubmitBundleRequest>,
) -> ServerResult<Json<SubmitBundleResponse>> {
    let signature = state.ledger.process(&request.bundle)?;
    Ok(Json(SubmitBundleResponse { signature }))
}

pub async fn bundle_status_handler(
    State(state): State<AppState>,
    Path(signature): Path<String>,
) -> ServerResult<Json<BundleStatusResponse>> {
    let signature = Signature::from_hex(&signature)
        .map_err(|e| ServerError::BadRequest(format!("invalid signature: {e}")))?;
    let status = state.ledger.bundle_status(&signature).await?;
    Ok(Json(BundleStatusResponse { signature, status }))
}

pub async fn airdrop_handler(
    State(state): State<AppState>,
    Json(request): Json<AirdropRequest>,
) -> ServerResult<Json<AirdropResponse>> {
    let limit = state.config.faucet_limit;
    if limit == 0 {
        return Err(ServerError::Forbidden("faucet is disabled".into()));
    }
    if request.lamports > limit {
        return Err(ServerError::Forbidden(format!(
            "airdrop of {} lamports exceeds faucet limit {limit}",
            request.lamports
        )));
    }
    let balance = state.ledger.airdrop(&request.address, request.lamports)?;
    Ok(Json(AirdropResponse {
        address: request.address,
        balance,
    }))
}
