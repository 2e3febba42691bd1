//! End-to-end mint flow over programmable mocks: publish the asset and
//! its metadata, submit the mint, then poll until completion.

use std::sync::Arc;
use std::time::Duration;

use certmint_minting::mock::MockMintingApi;
use certmint_minting::types::OnChainUpdate;
use certmint_minting::{
    MintError, MintOrchestrator, MintStatus, MintStatusPoller, MintTracker, Recipient,
    StatusUpdate,
};
use certmint_pinning::mock::MockPinningService;
use certmint_pinning::{AssetFile, AssetPublisher, CertificateMetadata};

const WALLET: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

fn certificate() -> CertificateMetadata {
    CertificateMetadata {
        name: "Rust Proficiency".to_string(),
        description: "Awarded for completing the course".to_string(),
        issuer: "Acme Academy".to_string(),
        issuance_date: "2024-06-01".to_string(),
        expiry_date: None,
    }
}

fn certificate_image() -> AssetFile {
    AssetFile {
        file_name: "certificate.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

#[tokio::test(start_paused = true)]
async fn test_publish_mint_poll_happy_path() {
    let pinning = Arc::new(MockPinningService::new());
    let minting = Arc::new(MockMintingApi::new());

    // Publish: image first, then the derived metadata document.
    let publisher = AssetPublisher::new(pinning.clone());
    let asset = publisher
        .publish(&certificate_image(), &certificate())
        .await
        .unwrap();

    assert!(asset.image_uri.starts_with("ipfs://"));
    assert!(asset.metadata_uri.starts_with("ipfs://"));

    let document = pinning
        .fetch_json(asset.metadata_uri.trim_start_matches("ipfs://"))
        .unwrap();
    assert_eq!(document["image"], asset.image_uri.as_str());
    assert_eq!(document["attributes"][2]["value"], "Never");

    // Mint: one submission, normalized into a pending record.
    let orchestrator = MintOrchestrator::new(minting.clone());
    let record = orchestrator
        .mint(
            &asset.metadata_uri,
            &asset.name,
            &asset.image_uri,
            &Recipient::wallet(WALLET),
        )
        .await
        .unwrap();

    assert_eq!(record.status, MintStatus::Pending);
    let submissions = minting.recorded_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].metadata_url, asset.metadata_uri);

    // Poll: two automatic checks reach completion, then the schedule
    // stops on its own.
    minting.push_status(StatusUpdate {
        status: Some(MintStatus::Minting),
        ..StatusUpdate::default()
    });
    minting.push_status(StatusUpdate {
        status: Some(MintStatus::Completed),
        on_chain: Some(OnChainUpdate {
            contract_address: Some("0xabc".to_string()),
            token_id: Some("42".to_string()),
        }),
        transaction_hash: Some("0xhash".to_string()),
    });

    let tracker = Arc::new(MintTracker::new(minting.clone(), record));
    let handle = MintStatusPoller::spawn(tracker.clone(), Duration::from_secs(10));

    tokio::time::sleep(Duration::from_secs(25)).await;

    let finished = tracker.record().await;
    assert_eq!(finished.status, MintStatus::Completed);
    assert_eq!(finished.on_chain.contract_address.as_deref(), Some("0xabc"));
    assert_eq!(finished.on_chain.token_id.as_deref(), Some("42"));
    assert_eq!(finished.transaction_hash.as_deref(), Some("0xhash"));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(minting.status_check_count(), 2);
    assert!(handle.is_finished());
}

#[tokio::test]
async fn test_invalid_recipient_stops_the_flow_before_submission() {
    let pinning = Arc::new(MockPinningService::new());
    let minting = Arc::new(MockMintingApi::new());

    let asset = AssetPublisher::new(pinning)
        .publish(&certificate_image(), &certificate())
        .await
        .unwrap();

    let err = MintOrchestrator::new(minting.clone())
        .mint(
            &asset.metadata_uri,
            &asset.name,
            &asset.image_uri,
            &Recipient::email("not-an-email"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MintError::InvalidRecipient(_)));
    assert!(minting.recorded_submissions().is_empty());
}

#[tokio::test]
async fn test_expiry_date_overrides_the_default() {
    let pinning = Arc::new(MockPinningService::new());

    let mut metadata = certificate();
    metadata.expiry_date = Some("2030-01-01".to_string());

    let asset = AssetPublisher::new(pinning.clone())
        .publish(&certificate_image(), &metadata)
        .await
        .unwrap();

    let document = pinning
        .fetch_json(asset.metadata_uri.trim_start_matches("ipfs://"))
        .unwrap();
    assert_eq!(document["attributes"][2]["value"], "2030-01-01");
}
