//! Wallet session state machine
//!
//! `WalletSession` is the single owner of wallet connection state. All
//! interaction with the injected provider goes through it, and it is the
//! only writer of its snapshot; screens read the snapshot and invoke the
//! session's operations.
//!
//! State machine: `Disconnected -> Connecting -> Connected`, with
//! `Connecting -> Disconnected` on any failure and
//! `Connected -> Disconnected` on explicit disconnect or a provider
//! account/chain change. Concurrent `connect()` calls are not coalesced;
//! callers are expected to disable the triggering control while a
//! connect is in flight.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::provider::{ProviderEvent, WalletProvider};
use crate::WalletError;

/// Balance shown when the balance query fails (non-fatal).
const ZERO_BALANCE: &str = "0.0000";

/// Read-only view of the session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub address: Option<String>,
    pub balance: Option<String>,
    pub connecting: bool,
    pub last_error: Option<String>,
}

/// Connection state derived from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Wallet session over an optionally present injected provider.
pub struct WalletSession {
    provider: Option<Arc<dyn WalletProvider>>,
    state: Mutex<SessionSnapshot>,
}

impl WalletSession {
    /// Create a session. `provider` is `None` when no wallet is injected
    /// into the execution environment; `connect()` then fails with
    /// `ProviderMissing`.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            provider,
            state: Mutex::new(SessionSnapshot::default()),
        }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().unwrap().clone()
    }

    /// Connected wallet address, if any.
    pub fn address(&self) -> Option<String> {
        self.state.lock().unwrap().address.clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        let state = self.state.lock().unwrap();
        if state.connecting {
            ConnectionState::Connecting
        } else if state.address.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Connect to the wallet provider, prompting the user if no account
    /// is already authorized. Returns the connected address.
    pub async fn connect(&self) -> Result<String, WalletError> {
        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => {
                let err = WalletError::ProviderMissing;
                self.state.lock().unwrap().last_error = Some(err.to_string());
                return Err(err);
            }
        };

        {
            let mut state = self.state.lock().unwrap();
            state.connecting = true;
            state.last_error = None;
        }

        match Self::establish(&provider, true).await {
            Ok((address, balance)) => {
                let mut state = self.state.lock().unwrap();
                state.connecting = false;
                state.address = Some(address.clone());
                state.balance = Some(balance);
                state.last_error = None;
                Ok(address)
            }
            Err(err) => {
                tracing::error!(error = %err, "Wallet connection failed");
                let mut state = self.state.lock().unwrap();
                *state = SessionSnapshot {
                    last_error: Some(err.to_string()),
                    ..SessionSnapshot::default()
                };
                Err(err)
            }
        }
    }

    /// Clear local session state. The provider has no permission
    /// revocation API, so this is local-only. Idempotent.
    pub fn disconnect(&self) {
        let mut state = self.state.lock().unwrap();
        *state = SessionSnapshot::default();
    }

    /// Opportunistic restore on initial load: if the provider already
    /// reports authorized accounts, re-establish the session without
    /// prompting. Failures are swallowed since this check is
    /// non-interactive.
    pub async fn try_restore(&self) {
        let Some(provider) = self.provider.as_ref().map(Arc::clone) else {
            return;
        };

        match provider.authorized_accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                match Self::establish(&provider, false).await {
                    Ok((address, balance)) => {
                        let mut state = self.state.lock().unwrap();
                        state.address = Some(address);
                        state.balance = Some(balance);
                        state.connecting = false;
                        state.last_error = None;
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "Wallet restore failed");
                    }
                }
            }
            Ok(_) => {
                tracing::debug!("No previously authorized wallet accounts");
            }
            Err(err) => {
                tracing::debug!(error = %err, "Wallet restore check failed");
            }
        }
    }

    /// Full reset-and-resync, used when the provider signals an account
    /// or chain change: every previously fetched address/balance pairing
    /// is invalid, so in-memory state is discarded rather than patched.
    pub async fn reload(&self) {
        self.disconnect();
        self.try_restore().await;
    }

    /// Subscribe to provider account/chain change notifications. Each
    /// notification triggers `reload()`. The returned handle aborts the
    /// listener task on drop so repeated mounts cannot accumulate
    /// duplicate handlers. Returns `None` when no provider is present.
    pub fn spawn_event_listener(self: &Arc<Self>) -> Option<EventListenerHandle> {
        let provider = self.provider.as_ref().map(Arc::clone)?;
        let session = Arc::clone(self);
        let mut events = provider.events();

        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        tracing::info!(?event, "Wallet provider notification, resetting session");
                        session.reload().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Missed notifications still mean the session is
                        // stale; a single reload resynchronizes.
                        tracing::warn!(missed, "Wallet event stream lagged, resetting session");
                        session.reload().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Some(EventListenerHandle { task })
    }

    async fn establish(
        provider: &Arc<dyn WalletProvider>,
        interactive: bool,
    ) -> Result<(String, String), WalletError> {
        let authorized = provider.authorized_accounts().await?;

        let address = match authorized.into_iter().next() {
            Some(address) => address,
            None if interactive => provider
                .request_accounts()
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    WalletError::Provider("no accounts returned by provider".to_string())
                })?,
            None => {
                return Err(WalletError::Provider(
                    "no authorized accounts".to_string(),
                ))
            }
        };

        let balance = match provider.balance_of(&address).await {
            Ok(balance) => balance,
            Err(err) => {
                tracing::warn!(error = %err, %address, "Balance query failed, falling back to zero");
                ZERO_BALANCE.to_string()
            }
        };

        Ok((address, balance))
    }
}

/// Handle to the provider event listener task. Aborts the task on drop.
pub struct EventListenerHandle {
    task: JoinHandle<()>,
}

impl EventListenerHandle {
    /// Stop listening for provider events.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for EventListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
