//! CertMint Asset Publishing
//!
//! Turns a local binary asset plus certificate metadata into two
//! permanent, content-addressed resources:
//! - `PinningService` trait over a pinning gateway (file + JSON uploads)
//! - `PinataClient` HTTP implementation
//! - `AssetPublisher` building the token metadata document
//! - Content-addressed mock for testing

pub mod mock;
pub mod pinata;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use pinata::{PinataClient, PinningConfig};

/// URI scheme identifying the content-addressed network.
pub const IPFS_SCHEME: &str = "ipfs";

/// Expiry attribute value when the certificate never expires.
const EXPIRY_NEVER: &str = "Never";

#[derive(Error, Debug)]
pub enum PinningError {
    #[error("Pinning configuration error: {0}")]
    Configuration(String),

    #[error("Unable to reach the pinning service: {0}")]
    NetworkUnavailable(String),

    #[error("Upload rejected with status {status}: {body}")]
    UploadFailed { status: u16, body: String },

    #[error("Pinning response error: {0}")]
    Response(String),
}

/// User-authored certificate metadata, immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateMetadata {
    pub name: String,
    pub description: String,
    pub issuer: String,
    pub issuance_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

/// A local binary asset to publish.
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Content-addressed identifiers produced by a publish. Both URIs use
/// the `ipfs://<hash>` form; content addressing makes them immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedAsset {
    pub metadata_uri: String,
    pub image_uri: String,
    pub name: String,
}

/// Build an `ipfs://` URI from a content hash.
pub fn ipfs_uri(hash: &str) -> String {
    format!("{}://{}", IPFS_SCHEME, hash)
}

/// Pinning gateway surface: raw file and JSON document uploads, each
/// returning the content hash of the pinned object.
#[async_trait::async_trait]
pub trait PinningService: Send + Sync {
    async fn pin_file(&self, file: &AssetFile) -> Result<String, PinningError>;

    async fn pin_json(&self, document: &serde_json::Value) -> Result<String, PinningError>;
}

/// Build the token metadata document referencing the pinned image.
///
/// Standard attribute entries carry issuer, issuance date, and expiry
/// date; a missing expiry becomes the literal `"Never"`.
pub fn token_metadata(metadata: &CertificateMetadata, image_uri: &str) -> serde_json::Value {
    serde_json::json!({
        "name": metadata.name,
        "description": metadata.description,
        "image": image_uri,
        "attributes": [
            { "trait_type": "Issuer", "value": metadata.issuer },
            { "trait_type": "Issuance Date", "value": metadata.issuance_date },
            {
                "trait_type": "Expiry Date",
                "value": metadata.expiry_date.as_deref().unwrap_or(EXPIRY_NEVER),
            },
        ],
    })
}

/// Publishes an asset and its derived metadata document through a
/// pinning service.
///
/// Publishing is not transactional: a metadata upload failure leaves
/// the asset already pinned. Content-addressed storage is idempotent,
/// so the orphaned object is merely unreferenced.
pub struct AssetPublisher {
    service: Arc<dyn PinningService>,
}

impl AssetPublisher {
    pub fn new(service: Arc<dyn PinningService>) -> Self {
        Self { service }
    }

    /// Publish the asset and its metadata document, returning the
    /// resulting content-addressed identifiers.
    pub async fn publish(
        &self,
        file: &AssetFile,
        metadata: &CertificateMetadata,
    ) -> Result<PublishedAsset, PinningError> {
        let image_hash = self.service.pin_file(file).await?;
        let image_uri = ipfs_uri(&image_hash);
        tracing::debug!(%image_uri, file_name = %file.file_name, "Asset pinned");

        let document = token_metadata(metadata, &image_uri);
        let metadata_hash = self.service.pin_json(&document).await?;
        let metadata_uri = ipfs_uri(&metadata_hash);
        tracing::debug!(%metadata_uri, name = %metadata.name, "Metadata pinned");

        Ok(PublishedAsset {
            metadata_uri,
            image_uri,
            name: metadata.name.clone(),
        })
    }
}
