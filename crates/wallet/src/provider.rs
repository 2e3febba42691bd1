//! Injected wallet provider interface
//!
//! Abstracts the EIP-1193-style provider surface the application consumes:
//! account queries, a balance lookup, and the account/chain change
//! notification stream.

use tokio::sync::broadcast;

/// EIP-1193 user rejection of a request
pub const ERR_USER_REJECTED: i64 = 4001;
/// A permission request is already being processed by the provider
pub const ERR_REQUEST_PENDING: i64 = -32002;
/// Internal provider error, observed when the wallet is locked
pub const ERR_WALLET_LOCKED: i64 = -32603;

/// Error returned by the injected provider RPC surface
#[derive(Debug, Clone, thiserror::Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Notifications emitted by the injected provider.
///
/// Either event invalidates every previously fetched address/balance
/// pairing, so the session treats both as a full reset trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(String),
}

/// Injected wallet provider surface consumed by the session.
#[async_trait::async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the user has already authorized for this origin,
    /// without prompting (`eth_accounts`).
    async fn authorized_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Prompt the user for account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Formatted native-token balance of an address.
    async fn balance_of(&self, address: &str) -> Result<String, ProviderError>;

    /// Subscribe to account/chain change notifications.
    fn events(&self) -> broadcast::Receiver<ProviderEvent>;
}
