//! CertMint Mint Orchestration
//!
//! Submits certificate mint requests to the custodial minting backend
//! (through the relay) and keeps the resulting mint record fresh:
//! - Domain types: `Recipient`, `MintStatus`, `MintRecord`
//! - `MintingApi` trait with a relay HTTP client and a programmable mock
//! - `MintOrchestrator`: one validated submission per user action,
//!   normalized into a canonical `MintRecord`
//! - `MintStatusPoller`: cancellable fixed-interval status refresh

pub mod client;
pub mod mock;
pub mod orchestrator;
pub mod poller;
pub mod types;

use thiserror::Error;

pub use client::{MintingConfig, RelayClient};
pub use orchestrator::MintOrchestrator;
pub use poller::{MintStatusPoller, MintTracker, PollerHandle, DEFAULT_POLL_INTERVAL};
pub use types::{
    MintRecord, MintStatus, MintSubmission, OnChainDetails, OnChainUpdate, RawMintResponse,
    Recipient, StatusUpdate,
};

#[derive(Error, Debug)]
pub enum MintError {
    #[error("Minting configuration error: {0}")]
    Configuration(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Mint request rejected: {0}")]
    RequestRejected(String),

    #[error("Status check failed: {0}")]
    StatusCheckFailed(String),

    #[error("Unable to reach the minting service: {0}")]
    NetworkUnavailable(String),

    #[error("Minting response error: {0}")]
    Response(String),
}

/// Minting backend surface consumed by the orchestrator and poller.
#[async_trait::async_trait]
pub trait MintingApi: Send + Sync {
    /// Submit one mint request.
    async fn submit_mint(&self, submission: &MintSubmission) -> Result<RawMintResponse, MintError>;

    /// Fetch the latest status of an in-flight mint.
    async fn check_status(&self, minting_id: &str) -> Result<StatusUpdate, MintError>;
}
