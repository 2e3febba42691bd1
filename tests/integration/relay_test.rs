//! Client-through-relay integration: the minting client talks to a
//! locally served relay, which forwards to a mocked upstream provider.

use std::net::SocketAddr;

use certmint_minting::{MintError, MintStatus, MintingApi, MintingConfig, RelayClient};
use certmint_relay::{create_app, RelayConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WALLET: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

fn relay_config(upstream: String) -> RelayConfig {
    RelayConfig {
        upstream_base_url: upstream,
        api_key: "api-key".to_string(),
        client_secret: "client-secret".to_string(),
        project_id: "project-1".to_string(),
        collection_id: "collection-1".to_string(),
        port: 0,
    }
}

/// Serve the relay on an ephemeral port and return a client bound to it.
async fn serve_relay(upstream: String) -> RelayClient {
    let app = create_app(relay_config(upstream));
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    RelayClient::new(MintingConfig {
        base_url: format!("http://{}", addr),
        anon_key: "anon-key".to_string(),
    })
}

fn submission() -> certmint_minting::MintSubmission {
    certmint_minting::MintSubmission {
        metadata_url: "ipfs://QmMeta".to_string(),
        name: "Cert A".to_string(),
        image: "ipfs://QmImage".to_string(),
        recipient_address: WALLET.to_string(),
        is_email: false,
    }
}

#[tokio::test]
async fn test_submit_mint_round_trips_through_the_relay() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/collection-1/nfts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "m1",
            "onChain": { "status": "pending", "contractAddress": "0xabc" },
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let client = serve_relay(upstream.uri()).await;

    let record = client.submit_mint(&submission()).await.unwrap().normalize();

    assert_eq!(record.minting_id, "m1");
    assert_eq!(record.status, MintStatus::Pending);
    assert_eq!(record.on_chain.contract_address.as_deref(), Some("0xabc"));
}

#[tokio::test]
async fn test_relay_rejection_reaches_the_client_with_its_message() {
    let client = serve_relay("http://127.0.0.1:9".to_string()).await;

    let mut bad = submission();
    bad.recipient_address = "0x123".to_string();

    let err = client.submit_mint(&bad).await.unwrap_err();

    match err {
        MintError::RequestRejected(message) => {
            assert!(message.contains("wallet address"), "got: {}", message)
        }
        other => panic!("expected RequestRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_status_projection_parses_as_a_partial_update() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nfts/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "m1",
            "status": "completed",
            "onChain": { "contractAddress": "0xabc", "tokenId": "7" },
            "transactionHash": "0xhash",
        })))
        .mount(&upstream)
        .await;

    let client = serve_relay(upstream.uri()).await;

    let update = client.check_status("m1").await.unwrap();

    assert_eq!(update.status, Some(MintStatus::Completed));
    let on_chain = update.on_chain.unwrap();
    assert_eq!(on_chain.contract_address.as_deref(), Some("0xabc"));
    assert_eq!(on_chain.token_id.as_deref(), Some("7"));
    assert_eq!(update.transaction_hash.as_deref(), Some("0xhash"));
}

#[tokio::test]
async fn test_upstream_failure_surfaces_as_rejection() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/collection-1/nfts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .mount(&upstream)
        .await;

    let client = serve_relay(upstream.uri()).await;

    let err = client.submit_mint(&submission()).await.unwrap_err();

    match err {
        MintError::RequestRejected(message) => {
            assert!(message.contains("provider exploded"), "got: {}", message)
        }
        other => panic!("expected RequestRejected, got {:?}", other),
    }
}
