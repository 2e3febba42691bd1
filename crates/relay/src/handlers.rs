//! Minting relay API handlers
//!
//! Validates incoming mint requests, rebuilds them in the upstream
//! provider's shape with server-held credentials attached, and forwards.
//! Upstream responses pass through on success; upstream failures come
//! back as 502 with the upstream payload in the message.

use axum::extract::State;
use axum::Json;
use certmint_common::{Error, Result};
use certmint_minting::Recipient;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::RelayState;

/// Request to submit a mint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub metadata_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub recipient_address: Option<String>,
    #[serde(default)]
    pub is_email: bool,
}

/// Request to check a mint's status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub minting_id: Option<String>,
}

/// Upstream NFT record; both response shapes the provider produces.
/// On-chain details appear either at the top level or nested.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamNft {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    contract_address: Option<String>,
    #[serde(default)]
    token_id: Option<String>,
    #[serde(default)]
    on_chain: Option<UpstreamOnChain>,
    #[serde(default)]
    transaction_hash: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamOnChain {
    #[serde(default)]
    contract_address: Option<String>,
    #[serde(default)]
    token_id: Option<String>,
}

fn upstream_request(
    state: &RelayState,
    request: reqwest::RequestBuilder,
) -> reqwest::RequestBuilder {
    request
        .header("x-client-secret", &state.config.client_secret)
        .header("x-project-id", &state.config.project_id)
        .header("X-API-KEY", &state.config.api_key)
}

async fn upstream_failure(context: &str, response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(%status, body = %body, "{} rejected upstream", context);
    Error::Upstream(format!("{} failed ({}): {}", context, status, body))
}

/// Submit a mint request
///
/// **POST /v1/mint**
///
/// Validates the recipient client-side semantics server-side too: the
/// same email / wallet-address shapes the client checks are enforced
/// here, so a malformed recipient never reaches the provider.
pub async fn submit_mint(
    State(state): State<RelayState>,
    Json(request): Json<MintRequest>,
) -> Result<Json<Value>> {
    let metadata_url = request
        .metadata_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::Validation("metadataUrl is required".to_string()))?;
    let recipient_address = request
        .recipient_address
        .filter(|a| !a.is_empty())
        .ok_or_else(|| Error::Validation("recipientAddress is required".to_string()))?;

    let recipient = if request.is_email {
        Recipient::email(&recipient_address)
    } else {
        Recipient::wallet(&recipient_address)
    };
    recipient
        .validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    // Email recipients are an object; wallet recipients are a
    // chain-qualified address string.
    let upstream_recipient = if request.is_email {
        json!({ "email": recipient_address })
    } else {
        Value::String(format!("polygon:{}", recipient_address))
    };

    let body = json!({
        "recipient": upstream_recipient,
        "metadata": {
            "name": request.name,
            "image": request.image,
            "uri": metadata_url,
        },
    });

    tracing::info!(
        is_email = request.is_email,
        collection_id = %state.config.collection_id,
        "Forwarding mint request upstream"
    );

    let response = upstream_request(
        &state,
        state.http.post(format!(
            "{}/collections/{}/nfts",
            state.config.upstream_base_url, state.config.collection_id
        )),
    )
    .json(&body)
    .send()
    .await
    .map_err(|e| Error::Upstream(format!("Minting provider unreachable: {}", e)))?;

    if !response.status().is_success() {
        return Err(upstream_failure("Mint request", response).await);
    }

    let payload: Value = response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("Invalid minting provider response: {}", e)))?;

    Ok(Json(payload))
}

/// Check a mint's status
///
/// **POST /v1/status**
///
/// Fetches the upstream NFT record and projects the fields clients
/// track: status, on-chain details, transaction hash. Status defaults
/// to `pending` when the provider omits it; on-chain details prefer the
/// top-level fields over the nested object.
pub async fn check_status(
    State(state): State<RelayState>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Value>> {
    let minting_id = request
        .minting_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Validation("mintingId is required".to_string()))?;

    let response = upstream_request(
        &state,
        state.http.get(format!(
            "{}/nfts/{}",
            state.config.upstream_base_url, minting_id
        )),
    )
    .send()
    .await
    .map_err(|e| Error::Upstream(format!("Minting provider unreachable: {}", e)))?;

    if !response.status().is_success() {
        return Err(upstream_failure("Status check", response).await);
    }

    let nft: UpstreamNft = response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("Invalid minting provider response: {}", e)))?;

    let on_chain = nft.on_chain.unwrap_or_default();

    Ok(Json(json!({
        "status": nft.status.unwrap_or_else(|| "pending".to_string()),
        "onChain": {
            "contractAddress": nft.contract_address.or(on_chain.contract_address),
            "tokenId": nft.token_id.or(on_chain.token_id),
        },
        "transactionHash": nft.transaction_hash,
    })))
}
