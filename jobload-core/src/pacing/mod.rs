//! Per-generator state machine and the pacing decision that drives it.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::registry::GeneratorConfig;
use crate::types::{PackagesCount, Variant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorStatus {
    Idle,
    Running,
    Paused,
    Stopped,
    Failed,
}

impl GeneratorStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GeneratorStatus::Stopped | GeneratorStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorStatus::Idle => "idle",
            GeneratorStatus::Running => "running",
            GeneratorStatus::Paused => "paused",
            GeneratorStatus::Stopped => "stopped",
            GeneratorStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for GeneratorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{variant}: illegal transition {from} -> {to}")]
pub struct TransitionError {
    pub variant: Variant,
    pub from: GeneratorStatus,
    pub to: GeneratorStatus,
}

/// Mutable state of one generator, owned by the loop that drives it.
#[derive(Debug, Clone)]
pub struct GeneratorState {
    variant: Variant,
    packages_run: u64,
    last_run_at: Option<Instant>,
    status: GeneratorStatus,
}

impl GeneratorState {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            packages_run: 0,
            last_run_at: None,
            status: GeneratorStatus::Idle,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn packages_run(&self) -> u64 {
        self.packages_run
    }

    pub fn last_run_at(&self) -> Option<Instant> {
        self.last_run_at
    }

    pub fn status(&self) -> GeneratorStatus {
        self.status
    }

    /// Count a fully executed package that finished at `at`.
    pub fn package_completed(&mut self, at: Instant) {
        self.packages_run += 1;
        self.last_run_at = Some(at);
    }

    pub fn transition(&mut self, to: GeneratorStatus) -> Result<(), TransitionError> {
        use GeneratorStatus::*;
        let allowed = matches!(
            (self.status, to),
            (Idle, Running)
                | (Running, Paused)
                | (Paused, Running)
                | (Running, Stopped)
                | (Paused, Stopped)
                | (Running, Failed)
        );
        if !allowed {
            return Err(TransitionError {
                variant: self.variant,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Decides when a generator may run its next package.
///
/// Pure over the config, the state and the supplied clock reading.
#[derive(Debug, Clone, Copy)]
pub struct PacingPolicy {
    package_size: u64,
    pause: Duration,
    packages_count: PackagesCount,
}

impl PacingPolicy {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            package_size: config.package_size,
            pause: config.pause,
            packages_count: config.packages_count,
        }
    }

    pub fn package_size(&self) -> u64 {
        self.package_size
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// False once a finite generator has run all its packages.
    pub fn has_remaining(&self, state: &GeneratorState) -> bool {
        self.packages_count.allows(state.packages_run())
    }

    pub fn should_run_next(&self, state: &GeneratorState, now: Instant) -> bool {
        if !self.has_remaining(state) {
            return false;
        }
        match state.last_run_at() {
            None => true,
            Some(last) => last.checked_add(self.pause).is_some_and(|at| now >= at),
        }
    }

    /// Time left until the next package is eligible; zero when it already is.
    pub fn next_delay(&self, state: &GeneratorState, now: Instant) -> Duration {
        match state.last_run_at() {
            None => Duration::ZERO,
            Some(last) => match last.checked_add(self.pause) {
                Some(at) => at.saturating_duration_since(now),
                None => Duration::MAX,
            },
        }
    }
}
