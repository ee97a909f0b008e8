use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use jobload_core::Variant;

use crate::executor::types::StopReason;
use crate::generator::{OpStep, PackageResult};

#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        target: String,
        variants: Vec<Variant>,
    },
    GeneratorStarted {
        run_id: Uuid,
        variant: Variant,
    },
    GeneratorPaused {
        run_id: Uuid,
        variant: Variant,
        delay_ms: u64,
    },
    PackageFinished {
        run_id: Uuid,
        result: PackageResult,
    },
    OperationFailed {
        run_id: Uuid,
        variant: Variant,
        package_no: u64,
        operation: u64,
        step: OpStep,
        message: String,
    },
    GeneratorStopped {
        run_id: Uuid,
        variant: Variant,
        reason: StopReason,
        packages_run: u64,
    },
    GeneratorFailed {
        run_id: Uuid,
        variant: Variant,
        error: String,
    },
    Progress {
        run_id: Uuid,
        lines: Vec<String>,
    },
    RunFinished {
        run_id: Uuid,
        cancelled: bool,
        failed: Vec<Variant>,
    },
}

impl Event {
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "run.started",
            Event::GeneratorStarted { .. } => "generator.started",
            Event::GeneratorPaused { .. } => "generator.paused",
            Event::PackageFinished { .. } => "package.finished",
            Event::OperationFailed { .. } => "operation.failed",
            Event::GeneratorStopped { .. } => "generator.stopped",
            Event::GeneratorFailed { .. } => "generator.failed",
            Event::Progress { .. } => "progress",
            Event::RunFinished { .. } => "run.finished",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let kind = self.type_name();
        match self {
            Event::RunStarted {
                run_id,
                target,
                variants,
            } => json!({
                "type": kind,
                "run_id": run_id.to_string(),
                "target": target,
                "variants": variants,
            }),
            Event::GeneratorStarted { run_id, variant } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "variant": variant })
            }
            Event::GeneratorPaused {
                run_id,
                variant,
                delay_ms,
            } => json!({
                "type": kind,
                "run_id": run_id.to_string(),
                "variant": variant,
                "delay_ms": delay_ms,
            }),
            Event::PackageFinished { run_id, result } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "result": result })
            }
            Event::OperationFailed {
                run_id,
                variant,
                package_no,
                operation,
                step,
                message,
            } => json!({
                "type": kind,
                "run_id": run_id.to_string(),
                "variant": variant,
                "package_no": package_no,
                "operation": operation,
                "step": step,
                "message": message,
            }),
            Event::GeneratorStopped {
                run_id,
                variant,
                reason,
                packages_run,
            } => json!({
                "type": kind,
                "run_id": run_id.to_string(),
                "variant": variant,
                "reason": reason,
                "packages_run": packages_run,
            }),
            Event::GeneratorFailed {
                run_id,
                variant,
                error,
            } => json!({
                "type": kind,
                "run_id": run_id.to_string(),
                "variant": variant,
                "error": error,
            }),
            Event::Progress { run_id, lines } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "lines": lines })
            }
            Event::RunFinished {
                run_id,
                cancelled,
                failed,
            } => json!({
                "type": kind,
                "run_id": run_id.to_string(),
                "cancelled": cancelled,
                "failed": failed,
            }),
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Writes every event to stdout as one JSON line.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

/// Logs events through `tracing`. Per-operation failures are logged at debug level.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        match &event {
            Event::RunStarted {
                run_id,
                target,
                variants,
            } => {
                tracing::info!(%run_id, %target, generators = variants.len(), "run started");
            }
            Event::GeneratorStarted { variant, .. } => {
                tracing::info!(%variant, "generator started");
            }
            Event::GeneratorPaused {
                variant, delay_ms, ..
            } => {
                tracing::trace!(%variant, delay_ms, "generator pausing");
            }
            Event::PackageFinished { result, .. } => {
                tracing::debug!(
                    variant = %result.variant,
                    package_no = result.package_no,
                    attempted = result.attempted,
                    succeeded = result.succeeded,
                    failed = result.failed,
                    interrupted = result.interrupted,
                    "package finished"
                );
            }
            Event::OperationFailed {
                variant,
                package_no,
                operation,
                message,
                ..
            } => {
                tracing::debug!(%variant, package_no, operation, %message, "operation failed");
            }
            Event::GeneratorStopped {
                variant,
                reason,
                packages_run,
                ..
            } => {
                tracing::info!(
                    %variant,
                    reason = reason.as_str(),
                    packages_run,
                    "generator stopped"
                );
            }
            Event::GeneratorFailed { variant, error, .. } => {
                tracing::warn!(%variant, %error, "generator failed");
            }
            Event::Progress { lines, .. } => {
                for line in lines {
                    tracing::info!("{line}");
                }
            }
            Event::RunFinished {
                run_id,
                cancelled,
                failed,
            } => {
                tracing::info!(%run_id, cancelled, failed = failed.len(), "run finished");
            }
        }
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
