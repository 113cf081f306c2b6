//! Error types for covergen

use thiserror::Error;

/// Result type alias using covergen's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Generic notice for transport or parse failures
pub const GENERIC_NOTICE: &str = "An unexpected error occurred. Please try again.";

/// Fallback notice when a download fails for the same reasons
pub const DOWNLOAD_NOTICE: &str = "An unexpected error occurred during download.";

/// covergen error types
#[derive(Error, Debug)]
pub enum Error {
    /// Structured error reported by the server; shown verbatim
    #[error("{message}")]
    Api { message: String },

    /// Local validation failure; no request was sent
    #[error("{message}")]
    Validation { message: String },

    #[error("A request for this action is already in progress")]
    Busy,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    pub fn api(message: impl Into<String>) -> Self {
        Error::Api {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Prefix a server-supplied message, leaving other variants untouched
    pub fn with_api_prefix(self, prefix: &str) -> Self {
        match self {
            Error::Api { message } => Error::Api {
                message: format!("{}{}", prefix, message),
            },
            other => other,
        }
    }

    /// True for failures the user caused or the server explained
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Api { .. } | Error::Validation { .. } | Error::Busy | Error::ConfigError { .. }
        )
    }

    /// Text to show the user: verbatim for application errors, `fallback` otherwise
    pub fn notice(&self, fallback: &str) -> String {
        if self.is_user_facing() {
            self.to_string()
        } else {
            fallback.to_string()
        }
    }
}
