use std::time::Duration;
use thiserror::Error;

/// Why an invitation token could not be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenProblem {
    Invalid,
    Expired,
    AlreadyUsed,
}

impl std::fmt::Display for TokenProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Invalid => "token is invalid",
            Self::Expired => "token has expired",
            Self::AlreadyUsed => "token has already been used",
        };
        f.write_str(text)
    }
}

/// Failures surfaced by the session core. Every variant is recoverable at the
/// call site and leaves session state well defined.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("sign-out failed: {0}")]
    Session(String),

    #[error("invitation {0}")]
    Token(TokenProblem),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl AuthError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    // Folds anything a provider returned into the variants a given operation
    // is allowed to report.
    pub(crate) fn for_login(self) -> Self {
        match self {
            Self::Authentication(_) | Self::Timeout { .. } => self,
            other => Self::Authentication(other.to_string()),
        }
    }

    pub(crate) fn for_logout(self) -> Self {
        match self {
            Self::Session(_) | Self::Timeout { .. } => self,
            other => Self::Session(other.to_string()),
        }
    }

    pub(crate) fn for_token_redemption(self) -> Self {
        match self {
            Self::Token(_) | Self::Authentication(_) | Self::Timeout { .. } => self,
            other => Self::Authentication(other.to_string()),
        }
    }
}
