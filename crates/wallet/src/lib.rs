//! CertMint Wallet Session
//!
//! Manages the lifecycle of a connection to a browser-injected wallet
//! provider:
//! - `WalletProvider` trait over the injected provider RPC surface
//! - `WalletSession` connection state machine with passive restore
//! - Provider event subscription with reset-and-resync semantics
//! - Programmable mock provider for testing

pub mod mock;
pub mod provider;
pub mod session;

use thiserror::Error;

use crate::provider::{ProviderError, ERR_REQUEST_PENDING, ERR_USER_REJECTED, ERR_WALLET_LOCKED};

pub use provider::{ProviderEvent, WalletProvider};
pub use session::{ConnectionState, EventListenerHandle, SessionSnapshot, WalletSession};

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("No wallet provider is available in this environment")]
    ProviderMissing,

    #[error("Connection rejected. Please approve the connection request.")]
    UserRejected,

    #[error("A connection request is already pending. Please check your wallet.")]
    RequestPending,

    #[error("The wallet is locked. Please unlock it and try again.")]
    WalletLocked,

    #[error("Wallet provider error: {0}")]
    Provider(String),
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        match err.code {
            ERR_USER_REJECTED => WalletError::UserRejected,
            ERR_REQUEST_PENDING => WalletError::RequestPending,
            ERR_WALLET_LOCKED => WalletError::WalletLocked,
            _ => WalletError::Provider(err.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_code_mapping() {
        let cases: Vec<(i64, &str)> = vec![
            (ERR_USER_REJECTED, "Connection rejected"),
            (ERR_REQUEST_PENDING, "already pending"),
            (ERR_WALLET_LOCKED, "wallet is locked"),
        ];

        for (code, expected_fragment) in cases {
            let err: WalletError = ProviderError {
                code,
                message: "provider detail".to_string(),
            }
            .into();
            assert!(
                err.to_string().contains(expected_fragment),
                "code {} should map to a message containing '{}', got '{}'",
                code,
                expected_fragment,
                err
            );
        }
    }

    #[test]
    fn test_unknown_provider_code_keeps_message() {
        let err: WalletError = ProviderError {
            code: -32000,
            message: "execution reverted".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Wallet provider error: execution reverted"
        );
    }
}
