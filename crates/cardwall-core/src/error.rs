use std::fmt;

use crate::model::Column;
use crate::roles::Action;

/// Machine-readable error codes for scripts and agents driving the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    MissingApiUrl,
    InvalidToken,
    TaskNotFound,
    NoTaskBoard,
    EmptyTitle,
    InvalidEnumValue,
    PermissionDenied,
    RemoteRejected,
    TransportFailed,
    DecodeFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::MissingApiUrl => "E1002",
            Self::InvalidToken => "E1003",
            Self::TaskNotFound => "E2001",
            Self::NoTaskBoard => "E2002",
            Self::EmptyTitle => "E2003",
            Self::InvalidEnumValue => "E2004",
            Self::PermissionDenied => "E3001",
            Self::RemoteRejected => "E5001",
            Self::TransportFailed => "E5002",
            Self::DecodeFailed => "E5003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::MissingApiUrl => "API base URL not configured",
            Self::InvalidToken => "Identity token could not be decoded",
            Self::TaskNotFound => "Task not found on board",
            Self::NoTaskBoard => "Service has no task board",
            Self::EmptyTitle => "Task title is empty",
            Self::InvalidEnumValue => "Invalid column/priority value",
            Self::PermissionDenied => "Permission denied",
            Self::RemoteRejected => "Remote API rejected the request",
            Self::TransportFailed => "Remote API unreachable",
            Self::DecodeFailed => "Unexpected response from remote API",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .cardwall/config.toml and retry."),
            Self::MissingApiUrl => {
                Some("Pass --api-url, set CARDWALL_API_URL, or add [api] base_url to config.")
            }
            Self::InvalidToken => Some("Log in again and pass a fresh token via --token or CARDWALL_TOKEN."),
            Self::TaskNotFound => Some("Run `cw board <service>` to list task ids."),
            Self::NoTaskBoard => Some("Create a task board for the service in the web app first."),
            Self::EmptyTitle => Some("Provide a non-blank --title."),
            Self::InvalidEnumValue => {
                Some("Columns: new, work, done. Priorities: low, medium, high, critical.")
            }
            Self::PermissionDenied => Some("Ask the service chief or an admin to perform this change."),
            Self::RemoteRejected => None,
            Self::TransportFailed => Some("Check the API URL and network, then retry."),
            Self::DecodeFailed => Some("Check that the API URL points at the tracker backend."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Everything that can go wrong while loading or mutating a board.
///
/// Validation and permission variants are always produced before any request
/// is sent; the remaining variants come from the remote side.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("{role} may not {action}")]
    PermissionDenied { action: Action, role: String },

    #[error("task {task_id} is not on this board")]
    TaskNotFound { task_id: String },

    #[error("service {service_id} has no task board")]
    NoTaskBoard { service_id: String },

    #[error("invalid {expected}: '{got}'")]
    InvalidEnumValue { expected: &'static str, got: String },

    #[error("identity token is invalid: {0}")]
    InvalidToken(String),

    #[error("{method} {url} returned HTTP {status}: {message}")]
    Remote {
        method: &'static str,
        url: String,
        status: u16,
        message: String,
    },

    #[error("{method} {url} failed: {message}")]
    Transport {
        method: &'static str,
        url: String,
        message: String,
    },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl BoardError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyTitle => ErrorCode::EmptyTitle,
            Self::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            Self::NoTaskBoard { .. } => ErrorCode::NoTaskBoard,
            Self::InvalidEnumValue { .. } => ErrorCode::InvalidEnumValue,
            Self::InvalidToken(_) => ErrorCode::InvalidToken,
            Self::Remote { .. } => ErrorCode::RemoteRejected,
            Self::Transport { .. } => ErrorCode::TransportFailed,
            Self::Decode { .. } => ErrorCode::DecodeFailed,
        }
    }

    /// Remediation hint, falling back to the code's summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.code();
        code.hint().unwrap_or(code.message()).to_string()
    }

    /// True for failures detected locally, before any request was made.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyTitle
                | Self::PermissionDenied { .. }
                | Self::TaskNotFound { .. }
                | Self::InvalidEnumValue { .. }
                | Self::InvalidToken(_)
        )
    }

    pub(crate) fn denied(action: Action, role: impl Into<String>) -> Self {
        Self::PermissionDenied {
            action,
            role: role.into(),
        }
    }

    pub(crate) fn bad_column(got: &str) -> Self {
        Self::InvalidEnumValue {
            expected: Column::EXPECTED,
            got: got.to_string(),
        }
    }
}
