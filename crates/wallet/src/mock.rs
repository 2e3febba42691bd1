//! Mock wallet provider implementation
//!
//! Programmable mock for testing wallet session workflows:
//! - `MockWalletProvider`: configurable provider with call recording
//! - `RequestOutcome`: grant or fail with a provider error code
//! - `emit()`: injects account/chain change notifications

use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::broadcast;

use crate::provider::{ProviderError, ProviderEvent, WalletProvider};

/// Outcome of a `request_accounts` prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Grant access to the configured accounts
    #[default]
    Grant,
    /// Fail with the given provider error code
    Error(i64),
}

#[derive(Debug)]
struct MockWalletBehavior {
    accounts: RwLock<Vec<String>>,
    authorized: RwLock<bool>,
    authorized_fails: RwLock<bool>,
    balance: RwLock<String>,
    balance_fails: RwLock<bool>,
    request_outcome: RwLock<RequestOutcome>,
}

impl Default for MockWalletBehavior {
    fn default() -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
            authorized: RwLock::new(false),
            authorized_fails: RwLock::new(false),
            balance: RwLock::new("0.0000".to_string()),
            balance_fails: RwLock::new(false),
            request_outcome: RwLock::new(RequestOutcome::Grant),
        }
    }
}

/// Recorded provider call for test assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    AuthorizedAccounts,
    RequestAccounts,
    BalanceOf(String),
}

/// Mock wallet provider with programmable behavior
#[derive(Clone)]
pub struct MockWalletProvider {
    behavior: Arc<MockWalletBehavior>,
    history: Arc<Mutex<Vec<RecordedCall>>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl Default for MockWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWalletProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            behavior: Arc::new(MockWalletBehavior::default()),
            history: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    /// Configure the provider's account list
    pub fn set_accounts(&self, accounts: Vec<String>) {
        *self.behavior.accounts.write().unwrap() = accounts;
    }

    /// Configure whether the accounts are already authorized for this
    /// origin (visible to `authorized_accounts` without prompting)
    pub fn set_authorized(&self, authorized: bool) {
        *self.behavior.authorized.write().unwrap() = authorized;
    }

    /// Configure the `authorized_accounts` query to fail
    pub fn set_authorized_fails(&self, fails: bool) {
        *self.behavior.authorized_fails.write().unwrap() = fails;
    }

    /// Configure the balance returned for any address
    pub fn set_balance(&self, balance: &str) {
        *self.behavior.balance.write().unwrap() = balance.to_string();
    }

    /// Configure the balance query to fail
    pub fn set_balance_fails(&self, fails: bool) {
        *self.behavior.balance_fails.write().unwrap() = fails;
    }

    /// Configure the outcome of the account access prompt
    pub fn set_request_outcome(&self, outcome: RequestOutcome) {
        *self.behavior.request_outcome.write().unwrap() = outcome;
    }

    /// Inject a provider notification. Dropped silently when no
    /// listener is subscribed, matching a real provider.
    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    /// Recorded provider calls
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.history.lock().unwrap().clone()
    }

    /// Number of times the user was prompted for account access
    pub fn request_accounts_calls(&self) -> usize {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == RecordedCall::RequestAccounts)
            .count()
    }

    /// Clear recorded calls
    pub fn reset_history(&self) {
        self.history.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl WalletProvider for MockWalletProvider {
    async fn authorized_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.history
            .lock()
            .unwrap()
            .push(RecordedCall::AuthorizedAccounts);

        if *self.behavior.authorized_fails.read().unwrap() {
            return Err(ProviderError::new(-32603, "mock authorization check failure"));
        }

        if *self.behavior.authorized.read().unwrap() {
            Ok(self.behavior.accounts.read().unwrap().clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.history
            .lock()
            .unwrap()
            .push(RecordedCall::RequestAccounts);

        match self.behavior.request_outcome.read().unwrap().clone() {
            RequestOutcome::Grant => {
                *self.behavior.authorized.write().unwrap() = true;
                Ok(self.behavior.accounts.read().unwrap().clone())
            }
            RequestOutcome::Error(code) => {
                Err(ProviderError::new(code, "mock request failure"))
            }
        }
    }

    async fn balance_of(&self, address: &str) -> Result<String, ProviderError> {
        self.history
            .lock()
            .unwrap()
            .push(RecordedCall::BalanceOf(address.to_string()));

        if *self.behavior.balance_fails.read().unwrap() {
            return Err(ProviderError::new(-32603, "mock balance failure"));
        }

        Ok(self.behavior.balance.read().unwrap().clone())
    }

    fn events(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let provider = MockWalletProvider::new();
        provider.set_accounts(vec!["0xabc".to_string()]);

        let _ = provider.authorized_accounts().await;
        let _ = provider.request_accounts().await;
        let _ = provider.balance_of("0xabc").await;

        assert_eq!(
            provider.recorded_calls(),
            vec![
                RecordedCall::AuthorizedAccounts,
                RecordedCall::RequestAccounts,
                RecordedCall::BalanceOf("0xabc".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_grant_marks_accounts_authorized() {
        let provider = MockWalletProvider::new();
        provider.set_accounts(vec!["0xabc".to_string()]);

        assert!(provider.authorized_accounts().await.unwrap().is_empty());
        provider.request_accounts().await.unwrap();
        assert_eq!(
            provider.authorized_accounts().await.unwrap(),
            vec!["0xabc".to_string()]
        );
    }
}
