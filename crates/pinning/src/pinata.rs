//! Pinata pinning gateway implementation
//!
//! Calls the Pinata pinning API (`pinFileToIPFS` / `pinJSONToIPFS`)
//! using reqwest, authenticated with a bearer JWT.

use reqwest::Client;
use serde::Deserialize;

use crate::{AssetFile, PinningError, PinningService};

const DEFAULT_BASE_URL: &str = "https://api.pinata.cloud";

/// Pinning service configuration
#[derive(Clone)]
pub struct PinningConfig {
    /// Base URL of the pinning gateway
    pub base_url: String,
    /// Bearer token for the gateway
    pub jwt: String,
}

impl std::fmt::Debug for PinningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinningConfig")
            .field("base_url", &self.base_url)
            .field("jwt", &"[REDACTED]")
            .finish()
    }
}

impl PinningConfig {
    /// Create pinning config from environment variables
    pub fn from_env() -> Result<Self, PinningError> {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("PINATA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let jwt = std::env::var("PINATA_JWT")
            .map_err(|_| PinningError::Configuration("PINATA_JWT is required".to_string()))?;

        Ok(Self { base_url, jwt })
    }
}

/// Pinata API pin response body
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Pinata pinning client
pub struct PinataClient {
    client: Client,
    config: PinningConfig,
}

impl PinataClient {
    pub fn new(config: PinningConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn handle_response(response: reqwest::Response) -> Result<String, PinningError> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(PinningError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }

        let pin: PinResponse = response
            .json()
            .await
            .map_err(|e| PinningError::Response(format!("Failed to parse pin response: {}", e)))?;

        Ok(pin.ipfs_hash)
    }

    fn map_transport_error(err: reqwest::Error) -> PinningError {
        // A transport-level failure is distinguished from an
        // application-level rejection so the UI can give different
        // guidance.
        PinningError::NetworkUnavailable(err.to_string())
    }
}

#[async_trait::async_trait]
impl PinningService for PinataClient {
    async fn pin_file(&self, file: &AssetFile) -> Result<String, PinningError> {
        let url = format!("{}/pinning/pinFileToIPFS", self.config.base_url);

        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| {
                PinningError::Configuration(format!(
                    "Invalid content type '{}': {}",
                    file.content_type, e
                ))
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(file_name = %file.file_name, size = file.bytes.len(), "Pinning file");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.jwt)
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Self::handle_response(response).await
    }

    async fn pin_json(&self, document: &serde_json::Value) -> Result<String, PinningError> {
        let url = format!("{}/pinning/pinJSONToIPFS", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.jwt)
            .json(document)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Self::handle_response(response).await
    }
}
