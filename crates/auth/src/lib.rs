//! Email/password authentication for CertMint
//!
//! Thin session layer over a GoTrue-style identity provider:
//! - `AuthApi`: provider abstraction (`sign_in`, `sign_up`, `sign_out`)
//! - `AuthClient`: HTTP implementation
//! - `AuthSession`: local session state driven by the provider
//! - `MockAuthApi`: programmable provider for tests
//!
//! Sign-up registers an account but does not authenticate; depending on
//! provider settings the account may need email confirmation first, so
//! the caller is expected to sign in explicitly afterwards.

pub mod client;
pub mod mock;
pub mod session;

pub use client::{AuthClient, AuthConfig};
pub use mock::{MockAuthApi, MockAuthOutcome, RecordedAuthCall};
pub use session::AuthSession;

use serde::{Deserialize, Serialize};

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication service unreachable: {0}")]
    NetworkUnavailable(String),

    /// Provider rejection, carrying the provider's message verbatim so
    /// the caller can show it to the user.
    #[error("{0}")]
    Provider(String),

    #[error("Invalid authentication response: {0}")]
    Response(String),
}

/// Registered account identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Authenticated session data returned by a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSessionData {
    pub access_token: String,
    pub user: AuthUser,
}

/// Identity provider operations
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange email/password credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSessionData, AuthError>;

    /// Register a new account. Returns the created user; no session is
    /// established.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Revoke the session behind `access_token` on the provider side.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
