//! Session cookie storage.
//!
//! The remote API identifies the browser session by a cookie. The terminal
//! console keeps that cookie in `~/.report-console/session.json` so a sign-in
//! survives between invocations, the way a browser jar would.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A session cookie captured from a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub name: String,
    pub value: String,
    pub saved_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            saved_at: Utc::now(),
        }
    }

    /// Parse the `name=value` pair at the head of a `Set-Cookie` header.
    ///
    /// Returns `None` for deletion cookies (empty value), which is how the
    /// server clears a session.
    pub fn from_set_cookie(header: &str) -> Option<Self> {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        let value = value.trim().trim_matches('"');
        if name.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self::new(name, value))
    }

    /// Value for a `Cookie` request header.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// File-backed token store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.report-console/session.json`
    pub fn default_location() -> Result<Self, TokenStoreError> {
        let dir = crate::util::console_dir().ok_or(TokenStoreError::HomeDirNotFound)?;
        Ok(Self::new(dir.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token; `Ok(None)` when nobody is signed in.
    pub fn load(&self) -> Result<Option<SessionToken>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, token: &SessionToken) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
                }
            }
        }

        let content = serde_json::to_string_pretty(token)?;
        crate::util::atomic_write_str(&self.path, &content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn delete(&self) -> Result<(), TokenStoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_set_cookie_header() {
        let token = SessionToken::from_set_cookie(
            "access_token=eyJhbGciOi.abc; HttpOnly; Max-Age=86400; Path=/; SameSite=lax",
        )
        .unwrap();
        assert_eq!(token.name, "access_token");
        assert_eq!(token.value, "eyJhbGciOi.abc");
        assert_eq!(token.header_value(), "access_token=eyJhbGciOi.abc");
    }

    #[test]
    fn test_deletion_cookie_is_ignored() {
        assert!(SessionToken::from_set_cookie(
            "access_token=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/"
        )
        .is_none());
        assert!(SessionToken::from_set_cookie("garbage").is_none());
    }

    #[test]
    fn test_save_load_delete() {
        let temp = TempDir::new().unwrap();
        let store = TokenStore::new(temp.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);

        let token = SessionToken::new("access_token", "abc");
        store.save(&token).unwrap();
        assert_eq!(store.load().unwrap(), Some(token));

        store.delete().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Deleting twice is fine.
        store.delete().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = TokenStore::new(temp.path().join("session.json"));
        store.save(&SessionToken::new("access_token", "abc")).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
