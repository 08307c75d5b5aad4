//! Error classification for the two remote calls the client makes.

use std::fmt;

/// Errors from the language-validation endpoint or the GitHub API.
///
/// Both calls fail open at the call site: the error is logged and the
/// UI state is left unchanged (or an error message is rendered), never
/// propagated as fatal.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Non-2xx HTTP status
    Http {
        provider: &'static str,
        status: u16,
    },
    /// Network or timeout error
    Network {
        provider: &'static str,
        message: String,
    },
    /// Response body could not be parsed
    Malformed {
        provider: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn http(provider: &'static str, status: u16) -> Self {
        ApiError::Http { provider, status }
    }

    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        ApiError::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        ApiError::Malformed {
            provider,
            message: message.into(),
        }
    }

    /// Provider name for this error
    pub fn provider_name(&self) -> &'static str {
        match self {
            ApiError::Http { provider, .. }
            | ApiError::Network { provider, .. }
            | ApiError::Malformed { provider, .. } => provider,
        }
    }

    /// HTTP status if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { provider, status } => {
                write!(f, "{}: HTTP {}", provider, status)
            }
            ApiError::Network { provider, message } => {
                write!(f, "{}: network error - {}", provider, message)
            }
            ApiError::Malformed { provider, message } => {
                write!(f, "{}: malformed response - {}", provider, message)
            }
        }
    }
}

impl std::error::Error for ApiError {}
