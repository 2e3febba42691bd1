//! Local authentication session state
//!
//! Wraps an `AuthApi` and tracks whether a user is currently signed in.
//! Sign-in stores the returned session; sign-up never does. Sign-out
//! always clears local state, even when the provider-side revocation
//! fails, so a dead provider cannot leave a stale local session.

use std::sync::{Arc, Mutex};

use crate::{AuthApi, AuthError, AuthSessionData, AuthUser};

pub struct AuthSession {
    api: Arc<dyn AuthApi>,
    state: Mutex<Option<AuthSessionData>>,
}

impl AuthSession {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self {
            api,
            state: Mutex::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().is_some()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.lock().unwrap().as_ref().map(|s| s.user.clone())
    }

    pub fn access_token(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Authenticate with email/password credentials and store the
    /// resulting session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let session = self.api.sign_in(email, password).await?;
        let user = session.user.clone();

        tracing::info!(user_id = %user.id, "User signed in");
        *self.state.lock().unwrap() = Some(session);

        Ok(user)
    }

    /// Register a new account. Local state is untouched; the caller
    /// signs in separately once the account is usable.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.api.sign_up(email, password).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// End the local session. The provider-side revocation is best
    /// effort; its failure is logged and the local session is cleared
    /// regardless. Idempotent when no session is held.
    pub async fn sign_out(&self) {
        let session = self.state.lock().unwrap().take();

        let Some(session) = session else {
            return;
        };

        if let Err(err) = self.api.sign_out(&session.access_token).await {
            tracing::warn!(
                error = %err,
                user_id = %session.user.id,
                "Provider sign-out failed; local session cleared anyway"
            );
        } else {
            tracing::info!(user_id = %session.user.id, "User signed out");
        }
    }
}
