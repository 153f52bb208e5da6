//! Error types for directory credential verification.
//!
//! Every stage of a verification returns a typed failure. The variants are split into two
//! audiences: operators see the full classification through [`AuthError::error_code`] and the
//! `Display` output, while end users only ever see [`AuthError::public_message`], which does
//! not distinguish an unknown user from a wrong password.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Public message for every failure that is attributable to the caller's input.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid username or password";

/// Public message for every failure that is attributable to the directory or its configuration.
pub const UNAVAILABLE_MESSAGE: &str = "authentication temporarily unavailable";

/// Network-facing stage of a verification in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Opening the search-phase connection.
    ServiceConnect,
    /// Binding the search-phase connection with the service identity.
    ServiceBind,
    /// Searching for the user entry.
    Search,
    /// Opening the isolated verification-phase connection.
    CredentialConnect,
    /// Binding as the resolved entry with the caller's password.
    CredentialBind,
}

impl Stage {
    /// Stable lowercase name used in log fields and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServiceConnect => "service_connect",
            Self::ServiceBind => "service_bind",
            Self::Search => "search",
            Self::CredentialConnect => "credential_connect",
            Self::CredentialBind => "credential_bind",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified verification failure.
///
/// No variant ever carries a password or the service secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Configuration is malformed; fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure (including timeouts) while talking to the directory.
    #[error("Directory connection error during {stage}: {message}")]
    Connection {
        /// Stage that failed
        stage: Stage,
        /// Transport level detail
        message: String,
    },

    /// The directory rejected the service identity.
    #[error("Service bind rejected: {0}")]
    ServiceBind(String),

    /// Input failed validation before any network call.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// No eligible entry matched the identifier.
    #[error("User not found")]
    UserNotFound,

    /// More than one eligible entry matched the identifier.
    #[error("Ambiguous user: {count} entries matched")]
    AmbiguousUser {
        /// Number of entries the directory returned (bounded by the search size limit)
        count: usize,
    },

    /// The directory rejected the caller's password.
    #[error("Credential rejected")]
    CredentialInvalid,
}

/// Specialized result type for verification operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Structured error body for transport layers.
///
/// Built from [`AuthError::public_code`] and [`AuthError::public_message`] so that it is safe to
/// return to an unauthenticated caller.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
    /// Optional request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl AuthError {
    /// Builds a connection error for the given stage.
    #[must_use]
    pub fn connection(stage: Stage, message: impl Into<String>) -> Self {
        Self::Connection {
            stage,
            message: message.into(),
        }
    }

    /// Builds a timeout error for the given stage.
    #[must_use]
    pub fn timeout(stage: Stage) -> Self {
        Self::connection(stage, format!("{stage} timed out"))
    }

    /// Returns the internal classification code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Connection { .. } => "CONNECTION_ERROR",
            Self::ServiceBind(_) => "SERVICE_BIND_ERROR",
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AmbiguousUser { .. } => "AMBIGUOUS_USER",
            Self::CredentialInvalid => "CREDENTIAL_INVALID",
        }
    }

    /// Returns true when the failure is attributable to the caller's input rather than to the
    /// directory or its configuration.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier(_)
                | Self::UserNotFound
                | Self::AmbiguousUser { .. }
                | Self::CredentialInvalid
        )
    }

    /// Returns the code that may be shown to an end user.
    #[must_use]
    pub const fn public_code(&self) -> &'static str {
        if self.is_user_facing() {
            "INVALID_CREDENTIALS"
        } else {
            "AUTHENTICATION_UNAVAILABLE"
        }
    }

    /// Returns the message that may be shown to an end user.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        if self.is_user_facing() {
            INVALID_CREDENTIALS_MESSAGE
        } else {
            UNAVAILABLE_MESSAGE
        }
    }

    /// Returns true if this error indicates a misconfigured directory integration and should be
    /// logged loudly.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::ServiceBind(_))
    }

    /// Returns the stage a connection error occurred in, if any.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Connection { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        self.into_error_response_with_id(None)
    }

    /// Converts the error into an `ErrorResponse` with a request ID.
    #[must_use]
    pub fn into_error_response_with_id(self, request_id: Option<String>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.public_code().to_string(),
                message: self.public_message().to_string(),
            },
            request_id,
        }
    }
}

impl From<url::ParseError> for AuthError {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration(format!("invalid directory URL: {err}"))
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Configuration(err.to_string())
    }
}
