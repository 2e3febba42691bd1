//! Mint orchestration
//!
//! Submits exactly one mint request per user action and normalizes the
//! backend's heterogeneous response shapes into a canonical
//! `MintRecord`. Holds no state; the caller owns the returned record.

use std::sync::Arc;

use crate::{MintError, MintRecord, MintSubmission, MintingApi, Recipient};

pub struct MintOrchestrator {
    api: Arc<dyn MintingApi>,
}

impl MintOrchestrator {
    pub fn new(api: Arc<dyn MintingApi>) -> Self {
        Self { api }
    }

    /// Submit a mint for a published asset. Recipient validation runs
    /// before any network call; an invalid recipient never reaches the
    /// backend.
    pub async fn mint(
        &self,
        metadata_uri: &str,
        name: &str,
        image_uri: &str,
        recipient: &Recipient,
    ) -> Result<MintRecord, MintError> {
        recipient.validate()?;

        let submission = MintSubmission {
            metadata_url: metadata_uri.to_string(),
            name: name.to_string(),
            image: image_uri.to_string(),
            recipient_address: recipient.address().to_string(),
            is_email: recipient.is_email(),
        };

        let raw = self.api.submit_mint(&submission).await?;
        let record = raw.normalize();

        tracing::info!(
            minting_id = %record.minting_id,
            status = %record.status,
            "Mint request accepted"
        );

        Ok(record)
    }
}
