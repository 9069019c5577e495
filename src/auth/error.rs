use std::fmt;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::util::{ErrorFactory, ErrorMap, FirebaseError};

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Coded rejection from the identity backend, already worded for the user.
    Firebase(FirebaseError),
    /// The identity backend could not be reached or answered garbage.
    Network(String),
    InvalidCredential(String),
    NotSignedIn,
    Persistence(String),
}

impl AuthError {
    pub fn code(&self) -> Option<&str> {
        match self {
            AuthError::Firebase(err) => Some(err.code.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Firebase(err) => write!(f, "{err}"),
            AuthError::Network(message) => write!(f, "Network error: {message}"),
            AuthError::InvalidCredential(message) => write!(f, "Invalid credential: {message}"),
            AuthError::NotSignedIn => write!(f, "No user is signed in"),
            AuthError::Persistence(message) => write!(f, "Credential storage failed: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<FirebaseError> for AuthError {
    fn from(error: FirebaseError) -> Self {
        AuthError::Firebase(error)
    }
}

const AUTH_ERRORS: ErrorMap = &[
    ("invalid-email", "The email address is badly formatted."),
    ("missing-password", "A non-empty password must be provided."),
    (
        "wrong-password",
        "The password is invalid or the user does not have a password.",
    ),
    (
        "user-not-found",
        "There is no user record corresponding to this identifier. The user may have been deleted.",
    ),
    (
        "invalid-credential",
        "The supplied auth credential is incorrect, malformed or has expired.",
    ),
    (
        "user-disabled",
        "The user account has been disabled by an administrator.",
    ),
    (
        "too-many-requests",
        "Access to this account has been temporarily disabled due to many failed login attempts. Try again later.",
    ),
    (
        "user-token-expired",
        "The user's credential is no longer valid. The user must sign in again.",
    ),
    (
        "invalid-user-token",
        "This user's credential isn't valid for this project. The user must sign in again.",
    ),
    (
        "invalid-api-key",
        "Your API key is invalid, please check you have copied it correctly.",
    ),
    (
        "operation-not-allowed",
        "The given sign-in provider is disabled for this Firebase project.",
    ),
    ("internal-error", "An internal AuthError has occurred: {$serverCode}"),
];

static AUTH_ERROR_FACTORY: LazyLock<ErrorFactory> =
    LazyLock::new(|| ErrorFactory::new("auth", "Firebase", AUTH_ERRORS));

/// Maps an Identity Toolkit / Secure Token error code to a worded [`AuthError`].
///
/// Backend messages look like `INVALID_PASSWORD` or
/// `TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account ...`; only the leading code is
/// significant.
pub fn map_server_error_code(raw: &str) -> AuthError {
    let server_code = raw.split(" : ").next().unwrap_or(raw).trim();
    let code = match server_code {
        "INVALID_EMAIL" => "invalid-email",
        "MISSING_PASSWORD" => "missing-password",
        "INVALID_PASSWORD" => "wrong-password",
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => "user-not-found",
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => "invalid-credential",
        "USER_DISABLED" => "user-disabled",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "too-many-requests",
        "TOKEN_EXPIRED" => "user-token-expired",
        "INVALID_REFRESH_TOKEN" | "INVALID_ID_TOKEN" | "INVALID_GRANT_TYPE" => {
            "invalid-user-token"
        }
        "PASSWORD_LOGIN_DISABLED" | "OPERATION_NOT_ALLOWED" => "operation-not-allowed",
        code if code.starts_with("API key not valid") || code == "INVALID_API_KEY" => {
            "invalid-api-key"
        }
        _ => {
            return AuthError::Firebase(
                AUTH_ERROR_FACTORY.create_with_data("internal-error", [("serverCode", server_code)]),
            )
        }
    };
    AuthError::Firebase(AUTH_ERROR_FACTORY.create(code))
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Interprets a non-success response body from the identity backend.
pub(crate) fn map_error_body(status: u16, body: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.message);
    match message {
        Some(message) => map_server_error_code(&message),
        None => AuthError::Network(format!("identity service responded with status {status}")),
    }
}
