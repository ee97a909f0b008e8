#![forbid(unsafe_code)]

//! Runtime for jobload runs.
//!
//! Each enabled generator gets its own task and its own queue client. The coordinator fans
//! them out, routes every package result through the [`ResultReporter`], and waits for all
//! generators to stop or fail.

pub mod executor;
pub mod generator;
pub mod shutdown;

pub use crate::executor::{
    AggregateStats, CompositeEventSink, Coordinator, CoordinatorError, Event, EventSink,
    GeneratorError, GeneratorOutcome, NoOpEventSink, ResultReporter, RunReport, StdoutEventSink,
    StopReason, TracingEventSink, VariantTotals,
};
pub use crate::generator::{
    loader_for, run_package, ConnectivityError, ConnectivityGuard, ErrorRecord, JobCounts,
    LoadGenerator, OpStep, OperationError, OperationErrorKind, OperationReport, PackageContext,
    PackageResult, PackageRun,
};
pub use crate::shutdown::{shutdown_channel, Shutdown, ShutdownTrigger};
