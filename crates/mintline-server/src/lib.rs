//! HTTP ledger node for Mintline.
//!
//! Hosts an [`InMemoryLedger`](mintline_ledger::InMemoryLedger) behind the
//! JSON endpoints defined in `mintline-protocol`, so clients can drive a
//! token lifecycle through `HttpConnection` exactly as they would against
//! any remote ledger.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::NodeConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::MintlineNode;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use mintline_crypto::Keypair;
    use mintline_ledger::{Instruction, OperationBundle, RejectReason, MINT_SIZE};
    use mintline_protocol::{
        AccountResponse, AirdropResponse, BlockhashResponse, BundleStatusResponse, ErrorResponse,
        RentResponse, SubmitBundleRequest, SubmitBundleResponse,
    };
    use mintline_types::Address;
    use serde::de::DeserializeOwned;
    use serde_json::json;
    use tower::util::ServiceExt;

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn post(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = MintlineNode::new(NodeConfig::default()).router();
        let (status, _) = get(&app, "/v1/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn rent_endpoint() {
        let app = MintlineNode::new(NodeConfig::default()).router();
        let (status, body) = get(&app, &format!("/v1/rent/{MINT_SIZE}")).await;
        assert_eq!(status, StatusCode::OK);
        let rent: RentResponse = parse(&body);
        assert_eq!(rent.lamports, 1_461_600);
    }

    #[tokio::test]
    async fn oversized_rent_query_is_bad_request() {
        let app = MintlineNode::new(NodeConfig::default()).router();
        let (status, body) = get(&app, &format!("/v1/rent/{}", usize::MAX)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = parse(&body);
        assert_eq!(error.code, 400);

        // The node is still serving afterwards.
        let (status, _) = get(&app, &format!("/v1/rent/{MINT_SIZE}")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_address_is_bad_request() {
        let app = MintlineNode::new(NodeConfig::default()).router();
        let (status, body) = get(&app, "/v1/accounts/not-hex").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = parse(&body);
        assert_eq!(error.code, 400);
        assert!(error.reason.is_none());
    }

    #[tokio::test]
    async fn airdrop_then_lookup() {
        let app = MintlineNode::new(NodeConfig::default()).router();
        let addr = Keypair::generate().address();

        let (status, body) = post(
            &app,
            "/v1/airdrop",
            json!({ "address": addr.to_hex(), "lamports": 5_000_000 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let airdrop: AirdropResponse = parse(&body);
        assert_eq!(airdrop.balance, 5_000_000);

        let (_, body) = get(&app, &format!("/v1/accounts/{}", addr.to_hex())).await;
        let account: AccountResponse = parse(&body);
        assert_eq!(account.account.unwrap().lamports, 5_000_000);
    }

    #[tokio::test]
    async fn faucet_limit_is_enforced() {
        let app = MintlineNode::new(NodeConfig {
            faucet_limit: 10,
            ..NodeConfig::default()
        })
        .router();
        let addr = Address::new([4; 32]);
        let (status, _) = post(
            &app,
            "/v1/airdrop",
            json!({ "address": addr.to_hex(), "lamports": 11 }),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn submitted_bundle_reports_status() {
        let node = MintlineNode::new(NodeConfig::default());
        let app = node.router();
        let authority = Keypair::generate();
        node.ledger()
            .airdrop(&authority.address(), 1_000_000_000)
            .unwrap();

        let (_, body) = get(&app, "/v1/blockhash").await;
        let blockhash: BlockhashResponse = parse(&body);

        let ghost = Address::random();
        let bundle = OperationBundle::new(authority.address())
            .with(Instruction::MintTo {
                mint: ghost,
                destination: Address::random(),
                authority: authority.address(),
                amount: 1,
            })
            .sign(blockhash.blockhash, &[&authority])
            .unwrap();
        let request = serde_json::to_value(SubmitBundleRequest { bundle }).unwrap();

        let (status, body) = post(&app, "/v1/bundles", request.clone()).await;
        assert_eq!(status, StatusCode::OK);
        let submitted: SubmitBundleResponse = parse(&body);

        let (_, body) = get(&app, &format!("/v1/bundles/{}", submitted.signature.to_hex())).await;
        let status: BundleStatusResponse = parse(&body);
        assert_eq!(
            status.status,
            Some(mintline_ledger::BundleStatus::Rejected {
                slot: 1,
                reason: RejectReason::MintNotFound(ghost),
            })
        );

        // Resubmitting the same bundle is refused outright.
        let (status, body) = post(&app, "/v1/bundles", request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = parse(&body);
        assert_eq!(error.reason, Some(RejectReason::AlreadyProcessed));
    }

    #[tokio::test]
    async fn unknown_signature_has_no_status() {
        let app = MintlineNode::new(NodeConfig::default()).router();
        let sig = Keypair::generate().sign(b"never submitted");
        let (status, body) = get(&app, &format!("/v1/bundles/{}", sig.to_hex())).await;
        assert_eq!(status, StatusCode::OK);
        let response: BundleStatusResponse = parse(&body);
        assert!(response.status.is_none());
    }
}
