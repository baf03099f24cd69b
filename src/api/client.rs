//! HTTP client for the report API.
//!
//! Uses reqwest with the session cookie attached to every request. The cookie
//! is captured from the login response and kept in memory plus, when a
//! [`TokenStore`] is configured, on disk.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, ReportApi};
use crate::token_store::{SessionToken, TokenStore};
use crate::types::{Credentials, ExportReceipt, Identity, MessageReceipt, Settings};

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    store: Option<TokenStore>,
    session: Mutex<Option<SessionToken>>,
}

impl HttpApi {
    /// Build a client for `base_url`, restoring any stored session.
    pub fn new(base_url: &str, store: Option<TokenStore>) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }

        let session = match &store {
            Some(store) => store.load()?,
            None => None,
        };

        let client = reqwest::Client::builder()
            .user_agent(concat!("report-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            store,
            session: Mutex::new(session),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_session(&self) -> bool {
        self.session
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Ok(guard) = self.session.lock() {
            if let Some(token) = guard.as_ref() {
                builder = builder.header(COOKIE, token.header_value());
            }
        }
        builder
    }

    fn remember(&self, token: SessionToken) -> Result<(), ApiError> {
        if let Some(store) = &self.store {
            store.save(&token)?;
        }
        if let Ok(mut guard) = self.session.lock() {
            *guard = Some(token);
        }
        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let resp = builder.send().await?;
        read_json(resp).await
    }
}

/// Interpret a response: non-2xx is an error carrying the body text, 204 (or an
/// empty body) is success without content.
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<Option<T>, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let message = if text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            text
        };
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let body = resp.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&body)?))
}

#[async_trait]
impl ReportApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let resp = self
            .request(Method::POST, "/auth/login")
            .json(credentials)
            .send()
            .await?;

        let cookie = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(SessionToken::from_set_cookie);

        let _: Option<serde_json::Value> = read_json(resp).await?;

        match cookie {
            Some(token) => self.remember(token),
            None => {
                log::warn!("Login succeeded but the server set no session cookie");
                Ok(())
            }
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> = self.send(self.request(Method::POST, "/auth/logout")).await?;
        Ok(())
    }

    fn clear_session(&self) -> Result<(), ApiError> {
        if let Ok(mut guard) = self.session.lock() {
            *guard = None;
        }
        if let Some(store) = &self.store {
            store.delete()?;
        }
        Ok(())
    }

    async fn me(&self) -> Result<Identity, ApiError> {
        self.send(self.request(Method::GET, "/auth/me"))
            .await?
            .ok_or(ApiError::EmptyResponse("/auth/me"))
    }

    async fn get_settings(&self) -> Result<Settings, ApiError> {
        self.send(self.request(Method::GET, "/settings"))
            .await?
            .ok_or(ApiError::EmptyResponse("/settings"))
    }

    async fn save_settings(&self, settings: &Settings) -> Result<Option<Settings>, ApiError> {
        self.send(self.request(Method::PUT, "/settings").json(settings))
            .await
    }

    async fn export_ppt(&self) -> Result<ExportReceipt, ApiError> {
        Ok(self
            .send(self.request(Method::POST, "/export-ppt"))
            .await?
            .unwrap_or_default())
    }

    async fn send_email(&self, email: &str) -> Result<MessageReceipt, ApiError> {
        let body = serde_json::json!({ "email": email });
        Ok(self
            .send(self.request(Method::POST, "/auth/send-email").json(&body))
            .await?
            .unwrap_or_default())
    }

    async fn schedule_email(&self) -> Result<MessageReceipt, ApiError> {
        Ok(self
            .send(self.request(Method::POST, "/schedule-email"))
            .await?
            .unwrap_or_default())
    }
}
