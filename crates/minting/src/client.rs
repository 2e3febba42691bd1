//! Relay HTTP client implementation
//!
//! Calls the minting backend relay (`/v1/mint` and `/v1/status`)
//! using reqwest, authenticated with the relay's anon key.

use reqwest::Client;
use serde_json::json;

use crate::{MintError, MintSubmission, MintingApi, RawMintResponse, StatusUpdate};

/// Minting relay configuration
#[derive(Clone)]
pub struct MintingConfig {
    /// Base URL of the minting relay
    pub base_url: String,
    /// Bearer key for the relay
    pub anon_key: String,
}

impl std::fmt::Debug for MintingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MintingConfig")
            .field("base_url", &self.base_url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl MintingConfig {
    /// Create minting config from environment variables
    pub fn from_env() -> Result<Self, MintError> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("MINT_RELAY_URL")
            .map_err(|_| MintError::Configuration("MINT_RELAY_URL is required".to_string()))?;
        let anon_key = std::env::var("MINT_RELAY_KEY")
            .map_err(|_| MintError::Configuration("MINT_RELAY_KEY is required".to_string()))?;

        Ok(Self { base_url, anon_key })
    }
}

/// HTTP client for the minting backend relay.
pub struct RelayClient {
    client: Client,
    config: MintingConfig,
}

impl RelayClient {
    pub fn new(config: MintingConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Extract a human-readable message from a relay error payload.
    /// Accepts both `{"error": {"code", "message"}}` and `{"error": "..."}`.
    fn extract_error_message(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("error")? {
            serde_json::Value::String(message) => Some(message.clone()),
            serde_json::Value::Object(object) => object
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        }
    }

    async fn rejection_message(response: reqwest::Response, fallback: &str) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::extract_error_message(&body)
            .unwrap_or_else(|| format!("{} ({})", fallback, status))
    }
}

#[async_trait::async_trait]
impl MintingApi for RelayClient {
    async fn submit_mint(&self, submission: &MintSubmission) -> Result<RawMintResponse, MintError> {
        tracing::debug!(
            name = %submission.name,
            is_email = submission.is_email,
            "Submitting mint request"
        );

        let response = self
            .client
            .post(self.endpoint("/v1/mint"))
            .bearer_auth(&self.config.anon_key)
            .json(submission)
            .send()
            .await
            .map_err(|e| MintError::NetworkUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MintError::RequestRejected(
                Self::rejection_message(response, "Failed to mint NFT").await,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| MintError::Response(format!("Failed to parse mint response: {}", e)))
    }

    async fn check_status(&self, minting_id: &str) -> Result<StatusUpdate, MintError> {
        let response = self
            .client
            .post(self.endpoint("/v1/status"))
            .bearer_auth(&self.config.anon_key)
            .json(&json!({ "mintingId": minting_id }))
            .send()
            .await
            .map_err(|e| MintError::NetworkUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MintError::StatusCheckFailed(
                Self::rejection_message(response, "Failed to check minting status").await,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| MintError::Response(format!("Failed to parse status response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: String) -> RelayClient {
        RelayClient::new(MintingConfig {
            base_url,
            anon_key: "anon-key".to_string(),
        })
    }

    fn submission() -> MintSubmission {
        MintSubmission {
            metadata_url: "ipfs://QmMeta".to_string(),
            name: "Cert A".to_string(),
            image: "ipfs://QmImage".to_string(),
            recipient_address: "0x52908400098527886E0F7030069857D2E4169EE7".to_string(),
            is_email: false,
        }
    }

    #[tokio::test]
    async fn test_submit_mint_posts_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/mint"))
            .and(header("authorization", "Bearer anon-key"))
            .and(body_json(serde_json::json!({
                "metadataUrl": "ipfs://QmMeta",
                "name": "Cert A",
                "image": "ipfs://QmImage",
                "recipientAddress": "0x52908400098527886E0F7030069857D2E4169EE7",
                "isEmail": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "m1",
                "status": "pending",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = client_for(server.uri())
            .submit_mint(&submission())
            .await
            .unwrap();

        assert_eq!(raw.id, "m1");
    }

    #[tokio::test]
    async fn test_rejection_extracts_structured_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/mint"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": "VALIDATION_ERROR", "message": "Invalid Ethereum wallet address" }
            })))
            .mount(&server)
            .await;

        let err = client_for(server.uri())
            .submit_mint(&submission())
            .await
            .unwrap_err();

        match err {
            MintError::RequestRejected(message) => {
                assert_eq!(message, "Invalid Ethereum wallet address")
            }
            other => panic!("expected RequestRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejection_accepts_plain_error_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/mint"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": "upstream exploded"})),
            )
            .mount(&server)
            .await;

        let err = client_for(server.uri())
            .submit_mint(&submission())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_check_status_returns_partial_update() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/status"))
            .and(body_json(serde_json::json!({"mintingId": "m1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "completed",
                "onChain": { "contractAddress": "0xabc", "tokenId": "7" },
                "transactionHash": "0xhash",
            })))
            .mount(&server)
            .await;

        let update = client_for(server.uri()).check_status("m1").await.unwrap();

        assert_eq!(update.status, Some(crate::MintStatus::Completed));
        let on_chain = update.on_chain.unwrap();
        assert_eq!(on_chain.contract_address.as_deref(), Some("0xabc"));
        assert_eq!(update.transaction_hash.as_deref(), Some("0xhash"));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_network_unavailable() {
        let err = client_for("http://127.0.0.1:9".to_string())
            .check_status("m1")
            .await
            .unwrap_err();

        assert!(matches!(err, MintError::NetworkUnavailable(_)));
    }
}
