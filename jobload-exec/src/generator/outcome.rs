use std::fmt;
use std::ops::AddAssign;

use serde::Serialize;

use jobload_client::{ClientError, JobStatus};
use jobload_core::Variant;

/// A single client call inside an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OpStep {
    Submit,
    Drop,
    SubmitBatch,
    DropBatch,
    Get,
    Commit,
    Read,
    Confirm,
}

impl OpStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpStep::Submit => "submit",
            OpStep::Drop => "drop",
            OpStep::SubmitBatch => "submitBatch",
            OpStep::DropBatch => "dropBatch",
            OpStep::Get => "get",
            OpStep::Commit => "commit",
            OpStep::Read => "read",
            OpStep::Confirm => "confirm",
        }
    }
}

impl fmt::Display for OpStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum OperationErrorKind {
    #[error(transparent)]
    Client(ClientError),
    #[error("queue returned no job")]
    EmptyQueue,
    #[error("job is {0}, expected Done")]
    UnexpectedStatus(JobStatus),
    #[error("batch of {expected} jobs acknowledged with {got} keys")]
    ShortBatch { expected: u64, got: u64 },
}

/// Why one operation of a package failed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{step} failed: {kind}")]
pub struct OperationError {
    pub step: OpStep,
    pub kind: OperationErrorKind,
}

impl OperationError {
    pub fn new(step: OpStep, kind: OperationErrorKind) -> Self {
        Self { step, kind }
    }

    pub fn client(step: OpStep, err: ClientError) -> Self {
        Self::new(step, OperationErrorKind::Client(err))
    }

    pub fn client_error(&self) -> Option<&ClientError> {
        match &self.kind {
            OperationErrorKind::Client(e) => Some(e),
            _ => None,
        }
    }

    /// True when the call failed below the service, so it says nothing about queue health.
    pub fn is_transport(&self) -> bool {
        self.client_error().is_some_and(ClientError::is_transport)
    }

    pub fn is_connect(&self) -> bool {
        matches!(self.client_error(), Some(ClientError::Connect { .. }))
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            OperationErrorKind::Client(e) => e.kind(),
            OperationErrorKind::EmptyQueue => "emptyQueue",
            OperationErrorKind::UnexpectedStatus(_) => "unexpectedStatus",
            OperationErrorKind::ShortBatch { .. } => "shortBatch",
        }
    }
}

/// Jobs that got through each kind of client call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCounts {
    pub submitted: u64,
    pub dropped: u64,
    pub committed: u64,
    pub confirmed: u64,
}

impl JobCounts {
    pub fn submitted(n: u64) -> Self {
        Self {
            submitted: n,
            ..Self::default()
        }
    }

    pub fn and_dropped(mut self, n: u64) -> Self {
        self.dropped = n;
        self
    }

    pub fn and_committed(mut self, n: u64) -> Self {
        self.committed = n;
        self
    }

    pub fn and_confirmed(mut self, n: u64) -> Self {
        self.confirmed = n;
        self
    }
}

impl AddAssign for JobCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.submitted += rhs.submitted;
        self.dropped += rhs.dropped;
        self.committed += rhs.committed;
        self.confirmed += rhs.confirmed;
    }
}

/// What one operation did.
#[derive(Debug, Clone)]
pub struct OperationReport {
    /// Calls that went through, even if a later step of the operation failed.
    pub jobs: JobCounts,
    pub outcome: Result<(), OperationError>,
}

impl OperationReport {
    pub fn succeeded(jobs: JobCounts) -> Self {
        Self {
            jobs,
            outcome: Ok(()),
        }
    }

    pub fn failed(jobs: JobCounts, error: OperationError) -> Self {
        Self {
            jobs,
            outcome: Err(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Position of the failed operation within its package, from zero.
    pub operation: u64,
    pub step: OpStep,
    pub kind: &'static str,
    pub message: String,
}

/// Counts for one executed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageResult {
    pub variant: Variant,
    pub package_no: u64,
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub jobs: JobCounts,
    pub errors: Vec<ErrorRecord>,
    /// Set when the package stopped before all its operations were dispatched.
    pub interrupted: bool,
}

impl PackageResult {
    pub fn new(variant: Variant, package_no: u64) -> Self {
        Self {
            variant,
            package_no,
            attempted: 0,
            succeeded: 0,
            failed: 0,
            jobs: JobCounts::default(),
            errors: Vec::new(),
            interrupted: false,
        }
    }

    pub fn record(&mut self, operation: u64, report: &OperationReport) {
        self.attempted += 1;
        self.jobs += report.jobs;
        match &report.outcome {
            Ok(()) => self.succeeded += 1,
            Err(e) => {
                self.failed += 1;
                self.errors.push(ErrorRecord {
                    operation,
                    step: e.step,
                    kind: e.kind_name(),
                    message: e.to_string(),
                });
            }
        }
    }
}
