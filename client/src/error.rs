use thiserror::Error;

use crate::session::State;

/// Message shown when the backend gives nothing better.
pub const FALLBACK_MESSAGE: &str = "Terjadi kesalahan";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    AlreadyLoggedIn { message: String },

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("not logged in")]
    Unauthenticated,
}

impl ApiError {
    /// Text to surface to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Forbidden { message }
            | Self::AlreadyLoggedIn { message }
            | Self::Rejected { message, .. } => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("camera unavailable: {0}")]
    Unavailable(String),
}

/// Misuse of the bottle session by its driver.
///
/// Network and camera failures never show up here; the session turns those
/// into notices and moves to the matching recovery state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("busy while {0}")]
    Busy(State),

    #[error("cannot {action} while {state}")]
    InvalidState { action: &'static str, state: State },

    #[error("sample number is empty")]
    EmptySample,

    #[error("no sample resolved")]
    NoSample,

    #[error("unknown bottle {0}")]
    UnknownBottle(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read secret {name}: {reason}")]
    Secret { name: &'static str, reason: String },
}
