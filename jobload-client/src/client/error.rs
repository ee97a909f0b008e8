use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("cannot connect to {address}: {message}")]
    Connect { address: String, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    #[error("service error {code}: {message}")]
    Service { code: String, message: String },
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Connection-level failures: the service may not have seen the call at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Connect { .. } | ClientError::Transport(_) | ClientError::Timeout(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Connect { .. } => "connect",
            ClientError::Transport(_) => "transport",
            ClientError::Timeout(_) => "timeout",
            ClientError::Service { .. } => "service",
            ClientError::Protocol(_) => "protocol",
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}
