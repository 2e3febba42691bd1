//! Mock identity provider implementation
//!
//! Programmable provider for session tests: configurable sign-in /
//! sign-up outcomes and recorded call history.

use std::sync::{Arc, Mutex, RwLock};

use crate::{AuthApi, AuthError, AuthSessionData, AuthUser};

/// Outcome of a sign-in or sign-up attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MockAuthOutcome {
    /// Accept the credentials
    #[default]
    Grant,
    /// Reject with the given provider message
    Deny(String),
    /// Fail at the transport level
    Unreachable,
}

/// Recorded provider call for assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAuthCall {
    SignIn { email: String },
    SignUp { email: String },
    SignOut,
}

/// Mock identity provider with programmable behavior
#[derive(Clone, Default)]
pub struct MockAuthApi {
    sign_in_outcome: Arc<RwLock<MockAuthOutcome>>,
    sign_up_outcome: Arc<RwLock<MockAuthOutcome>>,
    sign_out_fails: Arc<RwLock<bool>>,
    history: Arc<Mutex<Vec<RecordedAuthCall>>>,
}

impl MockAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sign_in_outcome(&self, outcome: MockAuthOutcome) {
        *self.sign_in_outcome.write().unwrap() = outcome;
    }

    pub fn set_sign_up_outcome(&self, outcome: MockAuthOutcome) {
        *self.sign_up_outcome.write().unwrap() = outcome;
    }

    pub fn set_sign_out_fails(&self, fails: bool) {
        *self.sign_out_fails.write().unwrap() = fails;
    }

    pub fn recorded_calls(&self) -> Vec<RecordedAuthCall> {
        self.history.lock().unwrap().clone()
    }

    pub fn reset_history(&self) {
        self.history.lock().unwrap().clear();
    }

    fn apply(outcome: &MockAuthOutcome) -> Result<(), AuthError> {
        match outcome {
            MockAuthOutcome::Grant => Ok(()),
            MockAuthOutcome::Deny(message) => Err(AuthError::Provider(message.clone())),
            MockAuthOutcome::Unreachable => Err(AuthError::NetworkUnavailable(
                "mock transport failure".to_string(),
            )),
        }
    }

    fn user_for(email: &str) -> AuthUser {
        AuthUser {
            id: format!("user-{}", email),
            email: email.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl AuthApi for MockAuthApi {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthSessionData, AuthError> {
        self.history.lock().unwrap().push(RecordedAuthCall::SignIn {
            email: email.to_string(),
        });

        Self::apply(&self.sign_in_outcome.read().unwrap())?;

        Ok(AuthSessionData {
            access_token: format!("token-{}", email),
            user: Self::user_for(email),
        })
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthUser, AuthError> {
        self.history.lock().unwrap().push(RecordedAuthCall::SignUp {
            email: email.to_string(),
        });

        Self::apply(&self.sign_up_outcome.read().unwrap())?;

        Ok(Self::user_for(email))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
        self.history.lock().unwrap().push(RecordedAuthCall::SignOut);

        if *self.sign_out_fails.read().unwrap() {
            return Err(AuthError::Provider("Session not found".to_string()));
        }

        Ok(())
    }
}
