use std::fmt;

pub type PanelResult<T> = Result<T, PanelError>;

/// Why a panel ended up showing the failure placeholder.
///
/// Only ever logged; the page shows the same generic message for every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    Transport(String),
    Status(u16),
    Decode(String),
    InvalidPath { path: String, message: String },
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Transport(message) => write!(f, "request failed: {message}"),
            PanelError::Status(status) => write!(f, "server responded with status {status}"),
            PanelError::Decode(message) => write!(f, "unexpected payload: {message}"),
            PanelError::InvalidPath { path, message } => {
                write!(f, "invalid panel path {path}: {message}")
            }
        }
    }
}

impl std::error::Error for PanelError {}
