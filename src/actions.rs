//! Manual report actions: send now, export, schedule.
//!
//! Each action resolves to a [`Notice`] for the banner. Failure text is the
//! server's response body, passed through unchanged.

use crate::api::{ApiError, ReportApi};
use crate::banner::Severity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }
}

impl From<Result<String, ApiError>> for Notice {
    fn from(result: Result<String, ApiError>) -> Self {
        match result {
            Ok(message) => Notice::success(message),
            Err(e) => Notice::error(e.to_string()),
        }
    }
}

/// Email the report to the signed-in account right away.
pub async fn send_now(api: &dyn ReportApi) -> Notice {
    let result = async {
        let identity = api.me().await?;
        log::info!("Sending report to {}", identity.email);
        let receipt = api.send_email(&identity.email).await?;
        Ok::<_, ApiError>(receipt.message)
    }
    .await;

    if let Err(e) = &result {
        log::warn!("Send now failed: {}", e);
    }
    result.into()
}

/// Build the slide deck on the server.
pub async fn export_ppt(api: &dyn ReportApi) -> Notice {
    let result = api
        .export_ppt()
        .await
        .map(|receipt| format!("Report exported to {}", receipt.ppt_path));

    if let Err(e) = &result {
        log::warn!("Export failed: {}", e);
    }
    result.into()
}

/// Ask the server to (re)install its send schedule from the stored settings.
pub async fn schedule_email(api: &dyn ReportApi) -> Notice {
    let result = api.schedule_email().await.map(|receipt| receipt.message);

    if let Err(e) = &result {
        log::warn!("Scheduling failed: {}", e);
    }
    result.into()
}
