//! Sign-in, the session gate, and sign-out.
//!
//! The gate asks the session-check endpoint once per mount whether the
//! stored cookie is still good. There is no retry: a failed check sends the
//! user to the login surface, and a new mount builds a new gate.

use crate::api::{ApiError, ReportApi};
use crate::error::ConsoleError;
use crate::types::{Credentials, Identity};

#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Pending,
    Authenticated(Identity),
    Unauthenticated,
}

#[derive(Debug)]
pub struct SessionGate {
    state: GateState,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Pending,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Run the single session check. Only acts while `Pending`; later calls
    /// return the settled state unchanged.
    pub async fn check(&mut self, api: &dyn ReportApi) -> &GateState {
        if self.state != GateState::Pending {
            return &self.state;
        }

        self.state = match api.me().await {
            Ok(identity) => {
                log::info!("Session check passed for {}", identity.email);
                GateState::Authenticated(identity)
            }
            Err(e) => {
                log::debug!("Session check failed: {}", e);
                GateState::Unauthenticated
            }
        };
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            GateState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Submit credentials. Every failure collapses into the one generic message
/// so the cause (unknown account, bad password, server down) is not revealed.
pub async fn login(api: &dyn ReportApi, email: &str, password: &str) -> Result<(), ConsoleError> {
    let credentials = Credentials {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    api.login(&credentials).await.map_err(|e| {
        log::debug!("Login failed for {}: {}", credentials.email, e);
        ConsoleError::LoginFailed
    })
}

/// Best-effort server-side sign-out, then always forget the local session.
pub async fn logout(api: &dyn ReportApi) -> Result<(), ApiError> {
    if let Err(e) = api.logout().await {
        log::warn!("Logout request failed, clearing local session anyway: {}", e);
    }
    api.clear_session()
}
