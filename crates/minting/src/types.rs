//! Mint domain types
//!
//! `MintRecord` is the canonical, locally held representation of one
//! mint's lifecycle. Its `minting_id` is assigned exactly once; status
//! checks merge into the record field-by-field and never replace it
//! wholesale.

use serde::{Deserialize, Serialize};

use crate::MintError;

/// Email shape accepted before dispatch; the relay re-validates.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
/// `0x`-prefixed 40-hex-digit wallet address.
pub const WALLET_ADDRESS_PATTERN: &str = r"^0x[a-fA-F0-9]{40}$";

/// Mint delivery target: a wallet address or an email-linked custodial
/// wallet. The variant decides both validation and the backend request
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Recipient {
    Wallet { address: String },
    Email { address: String },
}

impl Recipient {
    pub fn wallet(address: impl Into<String>) -> Self {
        Recipient::Wallet {
            address: address.into(),
        }
    }

    pub fn email(address: impl Into<String>) -> Self {
        Recipient::Email {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        match self {
            Recipient::Wallet { address } | Recipient::Email { address } => address,
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, Recipient::Email { .. })
    }

    /// Validate the recipient before any network call is made. The
    /// relay re-validates server-side as the source of truth.
    pub fn validate(&self) -> Result<(), MintError> {
        match self {
            Recipient::Wallet { address } => {
                if address.is_empty() {
                    return Err(MintError::InvalidRecipient(
                        "wallet address is required".to_string(),
                    ));
                }
                let pattern = regex::Regex::new(WALLET_ADDRESS_PATTERN).unwrap();
                if !pattern.is_match(address) {
                    return Err(MintError::InvalidRecipient(format!(
                        "'{}' is not a valid wallet address",
                        address
                    )));
                }
            }
            Recipient::Email { address } => {
                if address.is_empty() {
                    return Err(MintError::InvalidRecipient(
                        "email address is required".to_string(),
                    ));
                }
                let pattern = regex::Regex::new(EMAIL_PATTERN).unwrap();
                if !pattern.is_match(address) {
                    return Err(MintError::InvalidRecipient(format!(
                        "'{}' is not a valid email address",
                        address
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Mint lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MintStatus {
    #[default]
    Pending,
    Minting,
    Completed,
    Failed,
}

impl MintStatus {
    /// Terminal statuses expect no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MintStatus::Completed | MintStatus::Failed)
    }
}

impl std::fmt::Display for MintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MintStatus::Pending => write!(f, "pending"),
            MintStatus::Minting => write!(f, "minting"),
            MintStatus::Completed => write!(f, "completed"),
            MintStatus::Failed => write!(f, "failed"),
        }
    }
}

/// On-chain result fields, populated as the mint confirms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

/// Canonical, locally held representation of one mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRecord {
    pub minting_id: String,
    pub status: MintStatus,
    #[serde(default)]
    pub on_chain: OnChainDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

impl MintRecord {
    /// Merge a status response into the record field-by-field. Fields
    /// absent in the response are left untouched, preserving locally
    /// known values the status endpoint does not echo back.
    pub fn merge(&mut self, update: StatusUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(on_chain) = update.on_chain {
            if let Some(contract_address) = on_chain.contract_address {
                self.on_chain.contract_address = Some(contract_address);
            }
            if let Some(token_id) = on_chain.token_id {
                self.on_chain.token_id = Some(token_id);
            }
        }
        if let Some(transaction_hash) = update.transaction_hash {
            self.transaction_hash = Some(transaction_hash);
        }
    }
}

/// Request body sent to the relay's submit-mint endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintSubmission {
    pub metadata_url: String,
    pub name: String,
    pub image: String,
    pub recipient_address: String,
    pub is_email: bool,
}

/// On-chain fields of a raw backend response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOnChain {
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
}

/// Raw mint response from the backend.
///
/// The backend is not consistent across versions: on-chain fields may
/// arrive top-level or nested under `onChain`. Both shapes are accepted
/// and normalized defensively; neither is treated as authoritative.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMintResponse {
    pub id: String,
    #[serde(default)]
    pub status: Option<MintStatus>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub on_chain: Option<RawOnChain>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl RawMintResponse {
    /// Normalize either response shape into a canonical `MintRecord`,
    /// defaulting an omitted status to pending.
    pub fn normalize(self) -> MintRecord {
        let nested = self.on_chain.unwrap_or_default();
        MintRecord {
            minting_id: self.id,
            status: self.status.unwrap_or_default(),
            on_chain: OnChainDetails {
                contract_address: self.contract_address.or(nested.contract_address),
                token_id: self.token_id.or(nested.token_id),
            },
            transaction_hash: self.transaction_hash,
        }
    }
}

/// Partial status response merged into a `MintRecord`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MintStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_chain: Option<OnChainUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

/// On-chain fields of a status response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}
