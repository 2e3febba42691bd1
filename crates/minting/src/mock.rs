//! Mock minting backend implementation
//!
//! Programmable mock for testing mint workflows:
//! - `MockMintingApi`: configurable backend with request recording
//! - `MockMintOutcome`: accept, reject, or transport failure
//! - scripted status sequences via `push_status` / `set_status`

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use crate::types::{RawMintResponse, RawOnChain};
use crate::{MintError, MintSubmission, MintingApi, StatusUpdate};

/// What outcome a mint submission should produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockMintOutcome {
    /// Accept and return a raw response with the given id
    Accept { id: String },
    /// Reject with the given reason
    Reject(String),
    /// Fail at the transport level
    Unreachable,
}

impl Default for MockMintOutcome {
    fn default() -> Self {
        MockMintOutcome::Accept {
            id: "m1".to_string(),
        }
    }
}

/// Mock minting backend with programmable behavior
#[derive(Clone, Default)]
pub struct MockMintingApi {
    mint_outcome: Arc<RwLock<MockMintOutcome>>,
    /// Scripted updates consumed one per check; the last consumed update
    /// keeps being served once the script runs out.
    status_script: Arc<Mutex<VecDeque<StatusUpdate>>>,
    current_status: Arc<Mutex<StatusUpdate>>,
    failures_remaining: Arc<Mutex<u32>>,
    submissions: Arc<Mutex<Vec<MintSubmission>>>,
    status_checks: Arc<Mutex<Vec<String>>>,
}

impl MockMintingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mint submission outcome
    pub fn set_mint_outcome(&self, outcome: MockMintOutcome) {
        *self.mint_outcome.write().unwrap() = outcome;
    }

    /// Append a status update to the script
    pub fn push_status(&self, update: StatusUpdate) {
        self.status_script.lock().unwrap().push_back(update);
    }

    /// Replace the current status update (served when the script is empty)
    pub fn set_status(&self, update: StatusUpdate) {
        *self.current_status.lock().unwrap() = update;
    }

    /// Make the next `count` status checks fail
    pub fn fail_checks(&self, count: u32) {
        *self.failures_remaining.lock().unwrap() = count;
    }

    /// Recorded mint submissions
    pub fn recorded_submissions(&self) -> Vec<MintSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Mint ids of recorded status checks
    pub fn recorded_status_checks(&self) -> Vec<String> {
        self.status_checks.lock().unwrap().clone()
    }

    /// Number of status checks performed
    pub fn status_check_count(&self) -> usize {
        self.status_checks.lock().unwrap().len()
    }

    /// Clear recorded requests
    pub fn reset_history(&self) {
        self.submissions.lock().unwrap().clear();
        self.status_checks.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl MintingApi for MockMintingApi {
    async fn submit_mint(&self, submission: &MintSubmission) -> Result<RawMintResponse, MintError> {
        self.submissions.lock().unwrap().push(submission.clone());

        match self.mint_outcome.read().unwrap().clone() {
            MockMintOutcome::Accept { id } => Ok(RawMintResponse {
                id,
                status: None,
                contract_address: None,
                token_id: None,
                on_chain: Some(RawOnChain::default()),
                transaction_hash: None,
            }),
            MockMintOutcome::Reject(reason) => Err(MintError::RequestRejected(reason)),
            MockMintOutcome::Unreachable => Err(MintError::NetworkUnavailable(
                "mock transport failure".to_string(),
            )),
        }
    }

    async fn check_status(&self, minting_id: &str) -> Result<StatusUpdate, MintError> {
        self.status_checks
            .lock()
            .unwrap()
            .push(minting_id.to_string());

        {
            let mut failures = self.failures_remaining.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(MintError::StatusCheckFailed(
                    "mock status failure".to_string(),
                ));
            }
        }

        let mut current = self.current_status.lock().unwrap();
        if let Some(next) = self.status_script.lock().unwrap().pop_front() {
            *current = next;
        }
        Ok(current.clone())
    }
}
