use jobload_client::ClientError;
use jobload_core::{ConfigError, TransitionError};

use crate::generator::ConnectivityError;

/// Why a generator ended in `Failed`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeneratorError {
    #[error("connect failed: {0}")]
    Connect(ClientError),
    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("generator task panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}
