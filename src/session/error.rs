use std::fmt;

use crate::auth::AuthError;
use crate::session::status::MISSING_INPUT_MESSAGE;

/// Why a sign-in or session exchange attempt failed.
///
/// Every variant is terminal for the attempt; nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Email or password left empty; nothing was sent.
    Validation,
    /// The identity provider rejected the credentials or could not be reached.
    ///
    /// An unreachable provider is reported like any other transport failure.
    Provider(AuthError),
    /// The login endpoint could not be reached or answered unreadably.
    Transport(String),
    /// The login endpoint answered with a non-success status.
    Rejected { status: u16, message: Option<String> },
}

impl BridgeError {
    /// The exact text shown in the status line.
    pub fn user_message(&self) -> String {
        match self {
            BridgeError::Validation => MISSING_INPUT_MESSAGE.to_string(),
            BridgeError::Provider(AuthError::Network(description)) => {
                format!("Network error: {description}")
            }
            BridgeError::Provider(err) => format!("Login failed: {err}"),
            BridgeError::Transport(description) => format!("Network error: {description}"),
            BridgeError::Rejected { message, .. } => format!(
                "Login failed: {}",
                message
                    .as_deref()
                    .filter(|text| !text.is_empty())
                    .unwrap_or("Unknown error")
            ),
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Rejected { status, .. } => {
                write!(f, "{} (status {status})", self.user_message())
            }
            _ => f.write_str(&self.user_message()),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<AuthError> for BridgeError {
    fn from(error: AuthError) -> Self {
        BridgeError::Provider(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::map_server_error_code;

    #[test]
    fn rejection_uses_server_message_or_fallback() {
        let with_message = BridgeError::Rejected {
            status: 401,
            message: Some("invalid token".into()),
        };
        assert_eq!(with_message.user_message(), "Login failed: invalid token");

        let without = BridgeError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(without.user_message(), "Login failed: Unknown error");
    }

    #[test]
    fn provider_errors_are_surfaced_verbatim() {
        let error = BridgeError::from(map_server_error_code("USER_DISABLED"));
        assert_eq!(
            error.user_message(),
            "Login failed: Firebase: The user account has been disabled by an administrator. (auth/user-disabled)."
        );
    }

    #[test]
    fn transport_and_validation_messages() {
        assert_eq!(
            BridgeError::Transport("could not connect to the server".into()).user_message(),
            "Network error: could not connect to the server"
        );
        assert_eq!(
            BridgeError::Provider(AuthError::Network("the request timed out".into())).user_message(),
            "Network error: the request timed out"
        );
        assert_eq!(
            BridgeError::Validation.user_message(),
            "Please enter both email and password."
        );
    }
}
