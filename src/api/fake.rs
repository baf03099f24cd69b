//! In-memory `ReportApi` for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ApiError, ReportApi};
use crate::types::{Credentials, ExportReceipt, Identity, MessageReceipt, Settings};

pub(crate) struct FakeApi {
    pub email: String,
    pub password: String,
    pub signed_in: AtomicBool,
    pub stored: Mutex<Settings>,
    pub saves: Mutex<Vec<Settings>>,
    pub sent_to: Mutex<Vec<String>>,
    /// Number of upcoming `save_settings` calls that fail.
    pub failing_saves: AtomicUsize,
    pub fail_logout: AtomicBool,
    pub fail_send: Mutex<Option<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            email: "alice@nokia.com".to_string(),
            password: "secret".to_string(),
            signed_in: AtomicBool::new(false),
            stored: Mutex::new(Settings::default()),
            saves: Mutex::new(Vec::new()),
            sent_to: Mutex::new(Vec::new()),
            failing_saves: AtomicUsize::new(0),
            fail_logout: AtomicBool::new(false),
            fail_send: Mutex::new(None),
        }
    }

    pub fn signed_in() -> Self {
        let api = Self::new();
        api.signed_in.store(true, Ordering::SeqCst);
        api
    }

    pub fn with_settings(self, settings: Settings) -> Self {
        *self.stored.lock().unwrap() = settings;
        self
    }

    /// Simulate the server expiring the session cookie.
    pub fn expire_session(&self) {
        self.signed_in.store(false, Ordering::SeqCst);
    }

    pub fn saves(&self) -> Vec<Settings> {
        self.saves.lock().unwrap().clone()
    }

    fn require_session(&self) -> Result<(), ApiError> {
        if self.signed_in.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: 401,
                message: "{\"detail\":\"Not authenticated\"}".to_string(),
            })
        }
    }
}

#[async_trait]
impl ReportApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        if credentials.email == self.email && credentials.password == self.password {
            self.signed_in.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(ApiError::Status {
                status: 401,
                message: "{\"detail\":\"Invalid credentials\"}".to_string(),
            })
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        self.signed_in.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn clear_session(&self) -> Result<(), ApiError> {
        self.signed_in.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn me(&self) -> Result<Identity, ApiError> {
        self.require_session()?;
        Ok(Identity {
            email: self.email.clone(),
            id: Some(1),
            created_at: None,
        })
    }

    async fn get_settings(&self) -> Result<Settings, ApiError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<Option<Settings>, ApiError> {
        let failing = self.failing_saves.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_saves.store(failing - 1, Ordering::SeqCst);
            return Err(ApiError::Status {
                status: 500,
                message: "write failed".to_string(),
            });
        }
        self.require_session()?;
        self.saves.lock().unwrap().push(settings.clone());
        *self.stored.lock().unwrap() = settings.clone();
        Ok(Some(settings.clone()))
    }

    async fn export_ppt(&self) -> Result<ExportReceipt, ApiError> {
        Ok(ExportReceipt {
            ppt_path: "/srv/reports/report.pptx".to_string(),
        })
    }

    async fn send_email(&self, email: &str) -> Result<MessageReceipt, ApiError> {
        if let Some(message) = self.fail_send.lock().unwrap().clone() {
            return Err(ApiError::Status {
                status: 500,
                message,
            });
        }
        self.sent_to.lock().unwrap().push(email.to_string());
        Ok(MessageReceipt {
            message: "Email sent successfully".to_string(),
        })
    }

    async fn schedule_email(&self) -> Result<MessageReceipt, ApiError> {
        self.require_session()?;
        Ok(MessageReceipt {
            message: "Email scheduled successfully".to_string(),
        })
    }
}
