use serde::Serialize;
use thiserror::Error;

/// Maximum number of characters of a response body kept for diagnostics.
pub const BODY_EXCERPT_CHARS: usize = 500;

/// Failure of a single Overpass request. Never retried.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("geodata request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geodata service returned status {status}: {excerpt}")]
    ServiceStatus { status: u16, excerpt: String },

    #[error("geodata service returned an unreadable body ({source}): {excerpt}")]
    MalformedBody {
        excerpt: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    ServiceStatus,
    MalformedBody,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::ServiceStatus => "service_status",
            ErrorKind::MalformedBody => "malformed_body",
        }
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::ServiceStatus { .. } => ErrorKind::ServiceStatus,
            ClientError::MalformedBody { .. } => ErrorKind::MalformedBody,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ServiceStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// First [`BODY_EXCERPT_CHARS`] characters of `body`.
pub fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
