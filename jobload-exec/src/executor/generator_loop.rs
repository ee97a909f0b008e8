use std::sync::Arc;

use uuid::Uuid;

use jobload_client::ClientFactory;
use jobload_core::{GeneratorConfig, GeneratorState, GeneratorStatus, PacingPolicy};

use crate::executor::events::{Event, EventSink};
use crate::executor::reporter::ResultReporter;
use crate::executor::result::GeneratorError;
use crate::executor::types::{GeneratorOutcome, StopReason};
use crate::generator::{loader_for, run_package, ConnectivityGuard, PackageContext};
use crate::shutdown::Shutdown;

/// Shared handles every generator loop of a run needs.
#[derive(Clone)]
pub(crate) struct LoopDeps {
    pub run_id: Uuid,
    pub run_tag: String,
    pub max_consecutive_transport_errors: u32,
    pub factory: Arc<dyn ClientFactory>,
    pub reporter: Arc<ResultReporter>,
    pub event_sink: Arc<dyn EventSink>,
}

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// Drive one generator from Idle to a terminal state.
pub(crate) async fn run_generator(
    config: GeneratorConfig,
    deps: LoopDeps,
    shutdown: Shutdown,
) -> GeneratorOutcome {
    let variant = config.variant;
    let mut state = GeneratorState::new(variant);

    match drive(&config, &deps, &shutdown, &mut state).await {
        Ok(reason) => {
            deps.event_sink
                .emit(Event::GeneratorStopped {
                    run_id: deps.run_id,
                    variant,
                    reason,
                    packages_run: state.packages_run(),
                })
                .await;
            GeneratorOutcome {
                variant,
                status: state.status(),
                packages_run: state.packages_run(),
                stop_reason: Some(reason),
                error: None,
            }
        }
        Err(err) => {
            if let Err(e) = state.transition(GeneratorStatus::Failed) {
                tracing::debug!(error = %e, "generator already left the running state");
            }
            deps.event_sink
                .emit(Event::GeneratorFailed {
                    run_id: deps.run_id,
                    variant,
                    error: err.to_string(),
                })
                .await;
            GeneratorOutcome {
                variant,
                status: GeneratorStatus::Failed,
                packages_run: state.packages_run(),
                stop_reason: None,
                error: Some(err.to_string()),
            }
        }
    }
}

async fn drive(
    config: &GeneratorConfig,
    deps: &LoopDeps,
    shutdown: &Shutdown,
    state: &mut GeneratorState,
) -> Result<StopReason, GeneratorError> {
    let variant = config.variant;
    state.transition(GeneratorStatus::Running)?;
    deps.event_sink
        .emit(Event::GeneratorStarted {
            run_id: deps.run_id,
            variant,
        })
        .await;

    if shutdown.is_triggered() {
        state.transition(GeneratorStatus::Stopped)?;
        return Ok(StopReason::Cancelled);
    }

    let client = deps
        .factory
        .connect(variant)
        .await
        .map_err(GeneratorError::Connect)?;
    let loader = loader_for(config);
    let policy = PacingPolicy::new(config);
    let mut guard = ConnectivityGuard::new(deps.max_consecutive_transport_errors);

    loop {
        if !policy.has_remaining(state) {
            state.transition(GeneratorStatus::Stopped)?;
            return Ok(StopReason::Completed);
        }
        if shutdown.is_triggered() {
            state.transition(GeneratorStatus::Stopped)?;
            return Ok(StopReason::Cancelled);
        }

        let at = now();
        if !policy.should_run_next(state, at) {
            let delay = policy.next_delay(state, at);
            state.transition(GeneratorStatus::Paused)?;
            deps.event_sink
                .emit(Event::GeneratorPaused {
                    run_id: deps.run_id,
                    variant,
                    delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                })
                .await;
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.triggered() => {
                    state.transition(GeneratorStatus::Stopped)?;
                    return Ok(StopReason::Cancelled);
                }
            }
            state.transition(GeneratorStatus::Running)?;
            continue;
        }

        let ctx = PackageContext::new(config, &deps.run_tag, state.packages_run() + 1);
        let run = run_package(loader.as_ref(), client.as_ref(), &ctx, &mut guard, shutdown).await;

        deps.reporter.record(variant, &run.result).await;
        for error in &run.result.errors {
            deps.event_sink
                .emit(Event::OperationFailed {
                    run_id: deps.run_id,
                    variant,
                    package_no: ctx.package_no,
                    operation: error.operation,
                    step: error.step,
                    message: error.message.clone(),
                })
                .await;
        }
        let interrupted = run.result.interrupted;
        deps.event_sink
            .emit(Event::PackageFinished {
                run_id: deps.run_id,
                result: run.result,
            })
            .await;

        if let Some(err) = run.connectivity {
            return Err(err.into());
        }
        if interrupted {
            state.transition(GeneratorStatus::Stopped)?;
            return Ok(StopReason::Cancelled);
        }
        state.package_completed(now());
    }
}
