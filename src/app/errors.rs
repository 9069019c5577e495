use std::fmt;

use crate::auth::AuthError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    MissingBaseUrl,
    InvalidUrl { value: String, message: String },
    InvalidRoute { name: &'static str, value: String },
    InvalidConfig { source: String, message: String },
    HttpClient(String),
    /// The identity provider could not be set up.
    Identity(AuthError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingBaseUrl => write!(f, "No dashboard base URL configured"),
            AppError::InvalidUrl { value, message } => {
                write!(f, "Invalid URL '{value}': {message}")
            }
            AppError::InvalidRoute { name, value } => {
                write!(f, "Route '{name}' must be an absolute path, got '{value}'")
            }
            AppError::InvalidConfig { source, message } => {
                write!(f, "Invalid configuration from {source}: {message}")
            }
            AppError::HttpClient(message) => write!(f, "Failed to build HTTP client: {message}"),
            AppError::Identity(err) => write!(f, "Failed to initialize identity provider: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Identity(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        AppError::Identity(error)
    }
}
