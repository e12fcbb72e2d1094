//! Failures surfaced by [`Client`](crate::Client) calls.

use reqwest::StatusCode;

use crate::client::Response;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a request never produced a usable response.
#[derive(Debug, thiserror::Error)]
pub enum TransportFailure {
    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("nil context is not allowed")]
    InvalidContext,

    #[error("failed to build request: {what}: {source}")]
    RequestBuild {
        what: String,
        #[source]
        source: BoxError,
    },

    #[error("transport error: {source}")]
    Transport {
        #[source]
        source: TransportFailure,
        response: Option<Box<Response>>,
    },

    /// The remote answered with an error envelope. Displays the remote message verbatim.
    #[error("{message}")]
    Remote {
        message: String,
        response: Box<Response>,
    },

    #[error("failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        response: Box<Response>,
    },
}

impl ClientError {
    pub(crate) fn request_build(what: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::RequestBuild {
            what: what.into(),
            source: source.into(),
        }
    }

    pub(crate) fn transport(source: impl Into<TransportFailure>) -> Self {
        Self::Transport {
            source: source.into(),
            response: None,
        }
    }

    /// The response received before the failure, if the remote answered at all.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Transport { response, .. } => response.as_deref(),
            Self::Remote { response, .. } | Self::Decode { response, .. } => Some(&**response),
            Self::InvalidConfig(_) | Self::InvalidContext | Self::RequestBuild { .. } => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(Response::status)
    }

    /// The remote-supplied message of an error envelope.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                source: TransportFailure::Http(err),
                ..
            } if err.is_timeout()
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                source: TransportFailure::Cancelled,
                ..
            }
        )
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
