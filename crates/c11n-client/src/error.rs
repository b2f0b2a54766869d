//! Errors returned by the node client and supervisor.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The node process could not be started.
    #[error("failed to launch node {binary}: {source}")]
    Launch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Socket missing, connection refused, timeout, reset.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered, but not with 200. The body is never read.
    #[error("non-200 status from /{path}: {status}")]
    UnexpectedStatus {
        path: String,
        status: StatusCode,
        headers: HeaderMap,
    },

    /// The node answered 200 with a body that could not be decoded.
    #[error("malformed response body: {0}")]
    Decoding(#[from] BodyError),

    #[error("failed to encode request body: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("node not ready after {timeout:?}: {last}")]
    NotReady {
        timeout: Duration,
        #[source]
        last: Box<ClientError>,
    },
}

/// Why a 200 body was unusable.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<base64::DecodeError> for ClientError {
    fn from(e: base64::DecodeError) -> Self {
        ClientError::Decoding(e.into())
    }
}

impl From<std::string::FromUtf8Error> for ClientError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        ClientError::Decoding(e.into())
    }
}

/// Coarse classification for choosing a recovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Could not reach the node: restart it or wait.
    Unreachable,
    /// The node refused the request: fix the request.
    Rejected,
    /// The node accepted but the answer was unusable.
    Malformed,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Launch { .. } | ClientError::Transport(_) | ClientError::NotReady { .. } => {
                ErrorKind::Unreachable
            }
            ClientError::UnexpectedStatus { .. } | ClientError::Encoding(_) => ErrorKind::Rejected,
            ClientError::Decoding(_) => ErrorKind::Malformed,
        }
    }

    /// Status code for `UnexpectedStatus`, if that is what this is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
