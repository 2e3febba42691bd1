//! Wallet session lifecycle against the programmable mock provider.

use std::sync::Arc;
use std::time::Duration;

use certmint_wallet::mock::MockWalletProvider;
use certmint_wallet::{ConnectionState, ProviderEvent, WalletError, WalletSession};

const ACCOUNT_A: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
const ACCOUNT_B: &str = "0x8617E340B3D01FA5F11F306F4090FD50E238070D";

#[test_log::test(tokio::test)]
async fn test_connect_then_disconnect_round_trip() {
    let provider = Arc::new(MockWalletProvider::new());
    provider.set_accounts(vec![ACCOUNT_A.to_string()]);
    provider.set_balance("1.2345");

    let session = WalletSession::new(Some(provider));

    let address = session.connect().await.unwrap();
    assert_eq!(address, ACCOUNT_A);
    assert_eq!(session.connection_state(), ConnectionState::Connected);
    assert_eq!(session.snapshot().balance.as_deref(), Some("1.2345"));

    session.disconnect();
    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
    assert!(session.address().is_none());

    // Disconnect is idempotent.
    session.disconnect();
    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
}

#[test_log::test(tokio::test)]
async fn test_connect_without_provider_fails_locally() {
    let session = WalletSession::new(None);

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, WalletError::ProviderMissing));
    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
    assert!(session.snapshot().last_error.is_some());
}

#[test_log::test(tokio::test)]
async fn test_account_change_resyncs_the_session() {
    let provider = Arc::new(MockWalletProvider::new());
    provider.set_accounts(vec![ACCOUNT_A.to_string()]);

    let session = Arc::new(WalletSession::new(Some(provider.clone())));
    session.connect().await.unwrap();
    assert_eq!(session.address().as_deref(), Some(ACCOUNT_A));

    let _listener = session.spawn_event_listener().unwrap();

    provider.set_accounts(vec![ACCOUNT_B.to_string()]);
    provider.set_authorized(true);
    provider.emit(ProviderEvent::AccountsChanged(vec![ACCOUNT_B.to_string()]));

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        session.address().as_deref(),
        Some(ACCOUNT_B),
        "the session must follow the provider's active account"
    );
}

#[test_log::test(tokio::test)]
async fn test_chain_change_resyncs_without_losing_authorization() {
    let provider = Arc::new(MockWalletProvider::new());
    provider.set_accounts(vec![ACCOUNT_A.to_string()]);

    let session = Arc::new(WalletSession::new(Some(provider.clone())));
    session.connect().await.unwrap();

    let _listener = session.spawn_event_listener().unwrap();

    provider.emit(ProviderEvent::ChainChanged("0x89".to_string()));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        session.address().as_deref(),
        Some(ACCOUNT_A),
        "an authorized session survives a chain switch"
    );
}

#[test_log::test(tokio::test)]
async fn test_revoked_authorization_disconnects_on_event() {
    let provider = Arc::new(MockWalletProvider::new());
    provider.set_accounts(vec![ACCOUNT_A.to_string()]);

    let session = Arc::new(WalletSession::new(Some(provider.clone())));
    session.connect().await.unwrap();

    let _listener = session.spawn_event_listener().unwrap();

    provider.set_authorized(false);
    provider.set_accounts(vec![]);
    provider.emit(ProviderEvent::AccountsChanged(vec![]));

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
}
