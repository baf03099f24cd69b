//! Remote report API.
//!
//! Everything the console persists or triggers lives behind this HTTP API:
//! sign-in, the session check, the settings record, deck export, immediate
//! send and schedule refresh. `ReportApi` names those operations so the
//! session gate, wizard and sync worker can run against the real
//! [`client::HttpApi`] or a test double.
//!
//! Modules:
//! - client: reqwest implementation with cookie-based session credentials

pub mod client;
#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::types::{Credentials, ExportReceipt, Identity, MessageReceipt, Settings};

pub use client::HttpApi;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response; `message` is the body text, or the status reason when empty.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("Session storage: {0}")]
    Session(#[from] crate::token_store::TokenStoreError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Operations offered by the remote report service.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// `POST /auth/login`; establishes the session cookie.
    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError>;

    /// `POST /auth/logout`
    async fn logout(&self) -> Result<(), ApiError>;

    /// Drop locally held session credentials. Never contacts the server.
    fn clear_session(&self) -> Result<(), ApiError>;

    /// `GET /auth/me`
    async fn me(&self) -> Result<Identity, ApiError>;

    /// `GET /settings`
    async fn get_settings(&self) -> Result<Settings, ApiError>;

    /// `PUT /settings`; the store echoes the record it saved.
    async fn save_settings(&self, settings: &Settings) -> Result<Option<Settings>, ApiError>;

    /// `POST /export-ppt`
    async fn export_ppt(&self) -> Result<ExportReceipt, ApiError>;

    /// `POST /auth/send-email`
    async fn send_email(&self, email: &str) -> Result<MessageReceipt, ApiError>;

    /// `POST /schedule-email`
    async fn schedule_email(&self) -> Result<MessageReceipt, ApiError>;
}
