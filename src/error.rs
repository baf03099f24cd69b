//! Error types for the console
//!
//! Errors are classified by how they reach the user:
//! - Inline: validation messages next to a field
//! - Redirect: the session is gone, back to the login surface
//! - Silent: background sync failures, logged only
//! - Banner: manual actions, shown verbatim in the dismissible alert
//! - Fatal: start-up problems that end the process

use thiserror::Error;

use crate::api::ApiError;
use crate::token_store::TokenStoreError;
use crate::validate::ValidationError;

/// Error types for console operations
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid email or password")]
    LoginFailed,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Settings sync failed: {0}")]
    Sync(String),

    #[error("{0}")]
    Action(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session storage error: {0}")]
    SessionStorage(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Where an error is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Inline,
    Redirect,
    Silent,
    Banner,
    Fatal,
}

impl ConsoleError {
    pub fn surface(&self) -> Surface {
        match self {
            ConsoleError::Validation(_) | ConsoleError::LoginFailed => Surface::Inline,
            ConsoleError::NotAuthenticated => Surface::Redirect,
            ConsoleError::Sync(_) => Surface::Silent,
            ConsoleError::Action(_) => Surface::Banner,
            ConsoleError::Configuration(_)
            | ConsoleError::SessionStorage(_)
            | ConsoleError::Io(_) => Surface::Fatal,
        }
    }

    /// Text printed when a command ends with this error.
    pub fn report(&self) -> String {
        match self.surface() {
            Surface::Inline => self.to_string(),
            Surface::Redirect => format!("{}. {}", self, self.recovery_suggestion()),
            Surface::Silent | Surface::Banner | Surface::Fatal => {
                format!("Error: {}\n{}", self, self.recovery_suggestion())
            }
        }
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConsoleError::Validation(_) => "Correct the highlighted field.",
            ConsoleError::LoginFailed => "Check your email and password and try again.",
            ConsoleError::NotAuthenticated => "Run `report-console login` to sign in.",
            ConsoleError::Sync(_) => "Edits are kept locally; the next change retries the save.",
            ConsoleError::Action(_) => "Try the action again in a moment.",
            ConsoleError::Configuration(_) => {
                "Check your configuration in ~/.report-console/config.json"
            }
            ConsoleError::SessionStorage(_) => {
                "Check permissions on ~/.report-console/session.json"
            }
            ConsoleError::Io(_) => "Check file permissions and disk space.",
        }
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Io(err.to_string())
    }
}

impl From<TokenStoreError> for ConsoleError {
    fn from(err: TokenStoreError) -> Self {
        ConsoleError::SessionStorage(err.to_string())
    }
}

/// Remote failures outside login and sync surface as action errors, message verbatim.
impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        if err.is_unauthorized() {
            return ConsoleError::NotAuthenticated;
        }
        match err {
            ApiError::InvalidUrl(url) => ConsoleError::Configuration(format!("Invalid API URL: {}", url)),
            ApiError::Session(e) => ConsoleError::SessionStorage(e.to_string()),
            other => ConsoleError::Action(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_classification() {
        assert_eq!(
            ConsoleError::from(ValidationError::Time).surface(),
            Surface::Inline
        );
        assert_eq!(ConsoleError::NotAuthenticated.surface(), Surface::Redirect);
        assert_eq!(ConsoleError::Sync("boom".into()).surface(), Surface::Silent);
        assert_eq!(ConsoleError::Action("boom".into()).surface(), Surface::Banner);
        assert_eq!(
            ConsoleError::Configuration("bad".into()).surface(),
            Surface::Fatal
        );
    }

    #[test]
    fn test_api_errors_keep_server_message() {
        let err = ConsoleError::from(ApiError::Status {
            status: 500,
            message: "SMTP relay refused".to_string(),
        });
        assert_eq!(err.to_string(), "SMTP relay refused");
        assert_eq!(err.surface(), Surface::Banner);
    }

    #[test]
    fn test_report_follows_surface() {
        assert_eq!(
            ConsoleError::from(ValidationError::Equation).report(),
            ValidationError::Equation.to_string()
        );
        assert_eq!(
            ConsoleError::NotAuthenticated.report(),
            "Not signed in. Run `report-console login` to sign in."
        );
        assert_eq!(
            ConsoleError::Action("SMTP down".into()).report(),
            "Error: SMTP down\nTry the action again in a moment."
        );
        assert!(ConsoleError::Io("disk full".into())
            .report()
            .starts_with("Error: IO error: disk full\n"));
    }

    #[test]
    fn test_unauthorized_redirects() {
        let err = ConsoleError::from(ApiError::Status {
            status: 401,
            message: "Not authenticated".to_string(),
        });
        assert!(matches!(err, ConsoleError::NotAuthenticated));
    }
}
