use crate::generator::OperationError;

#[derive(Debug, Clone, thiserror::Error)]
#[error("queue unreachable after {consecutive} consecutive transport failures; last: {last}")]
pub struct ConnectivityError {
    pub consecutive: u32,
    pub last: String,
}

/// Tracks consecutive transport-class failures of one generator across packages.
///
/// A success or a service-level error resets the streak. The guard trips when the streak
/// reaches the threshold, or on a connect failure before any operation has succeeded.
#[derive(Debug, Clone)]
pub struct ConnectivityGuard {
    threshold: u32,
    consecutive: u32,
    ever_succeeded: bool,
}

impl ConnectivityGuard {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive: 0,
            ever_succeeded: false,
        }
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn observe(&mut self, outcome: &Result<(), OperationError>) -> Option<ConnectivityError> {
        match outcome {
            Ok(()) => {
                self.ever_succeeded = true;
                self.consecutive = 0;
                None
            }
            Err(e) if e.is_transport() => {
                self.consecutive += 1;
                let never_connected = e.is_connect() && !self.ever_succeeded;
                if never_connected || self.consecutive >= self.threshold {
                    return Some(ConnectivityError {
                        consecutive: self.consecutive,
                        last: e.to_string(),
                    });
                }
                None
            }
            Err(_) => {
                self.consecutive = 0;
                None
            }
        }
    }
}
