//! Mock pinning service implementation
//!
//! Programmable, genuinely content-addressed mock for testing publish
//! workflows: pinned objects are stored under a hash of their bytes and
//! can be fetched back, so immutability and round-trip properties are
//! observable in tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use sha2::{Digest, Sha256};

use crate::{AssetFile, PinningError, PinningService};

/// What outcome a pin call should produce
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MockPinOutcome {
    /// Store the object and return its content hash
    #[default]
    Pin,
    /// Reject with an application-level status and body
    Reject(u16, String),
    /// Fail at the transport level
    Unreachable,
}

/// Mock pinning service with programmable behavior
#[derive(Clone, Default)]
pub struct MockPinningService {
    file_outcome: Arc<RwLock<MockPinOutcome>>,
    json_outcome: Arc<RwLock<MockPinOutcome>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    documents: Arc<Mutex<HashMap<String, serde_json::Value>>>,
}

impl MockPinningService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the outcome of file pins
    pub fn set_file_outcome(&self, outcome: MockPinOutcome) {
        *self.file_outcome.write().unwrap() = outcome;
    }

    /// Configure the outcome of JSON pins
    pub fn set_json_outcome(&self, outcome: MockPinOutcome) {
        *self.json_outcome.write().unwrap() = outcome;
    }

    /// Fetch pinned file bytes by content hash
    pub fn fetch_file(&self, hash: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(hash).cloned()
    }

    /// Fetch a pinned JSON document by content hash
    pub fn fetch_json(&self, hash: &str) -> Option<serde_json::Value> {
        self.documents.lock().unwrap().get(hash).cloned()
    }

    /// Number of files pinned so far
    pub fn pinned_files(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    /// Number of JSON documents pinned so far
    pub fn pinned_documents(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    fn content_hash(bytes: &[u8]) -> String {
        let digest = Sha256::digest(bytes);
        format!("Qm{}", hex::encode(&digest[..16]))
    }

    fn apply(outcome: &MockPinOutcome) -> Result<(), PinningError> {
        match outcome {
            MockPinOutcome::Pin => Ok(()),
            MockPinOutcome::Reject(status, body) => Err(PinningError::UploadFailed {
                status: *status,
                body: body.clone(),
            }),
            MockPinOutcome::Unreachable => Err(PinningError::NetworkUnavailable(
                "mock transport failure".to_string(),
            )),
        }
    }
}

#[async_trait::async_trait]
impl PinningService for MockPinningService {
    async fn pin_file(&self, file: &AssetFile) -> Result<String, PinningError> {
        Self::apply(&self.file_outcome.read().unwrap())?;

        let hash = Self::content_hash(&file.bytes);
        self.files
            .lock()
            .unwrap()
            .insert(hash.clone(), file.bytes.clone());
        Ok(hash)
    }

    async fn pin_json(&self, document: &serde_json::Value) -> Result<String, PinningError> {
        Self::apply(&self.json_outcome.read().unwrap())?;

        let bytes = serde_json::to_vec(document)
            .map_err(|e| PinningError::Response(format!("Unserializable document: {}", e)))?;
        let hash = Self::content_hash(&bytes);
        self.documents
            .lock()
            .unwrap()
            .insert(hash.clone(), document.clone());
        Ok(hash)
    }
}
