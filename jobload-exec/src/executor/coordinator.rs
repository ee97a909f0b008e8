use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use jobload_client::ClientFactory;
use jobload_core::{GeneratorRegistry, GeneratorStatus, Variant};

use crate::executor::events::{Event, EventSink};
use crate::executor::generator_loop::{run_generator, LoopDeps};
use crate::executor::reporter::ResultReporter;
use crate::executor::result::{CoordinatorError, GeneratorError};
use crate::executor::types::{GeneratorOutcome, RunReport};
use crate::shutdown::{shutdown_channel, Shutdown};

/// Runs every enabled generator of a registry concurrently until each one stops or fails.
pub struct Coordinator {
    registry: GeneratorRegistry,
    factory: Arc<dyn ClientFactory>,
    event_sink: Arc<dyn EventSink>,
}

impl Coordinator {
    pub fn new(
        registry: GeneratorRegistry,
        factory: Arc<dyn ClientFactory>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            registry,
            factory,
            event_sink,
        }
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub async fn run(&self, shutdown: Shutdown) -> Result<RunReport, CoordinatorError> {
        self.registry.ensure_runnable()?;
        let variants: Vec<Variant> = self.registry.enabled_variants().into_iter().collect();
        let run_options = self.registry.run_options().clone();

        let run_id = Uuid::new_v4();
        let reporter = Arc::new(ResultReporter::new(variants.iter().copied()));
        self.event_sink
            .emit(Event::RunStarted {
                run_id,
                target: self.registry.target().address.to_string(),
                variants: variants.clone(),
            })
            .await;

        let (ticker_stop, ticker_shutdown) = shutdown_channel();
        let ticker = run_options.report_interval.map(|interval| {
            spawn_ticker(
                run_id,
                interval,
                reporter.clone(),
                self.event_sink.clone(),
                ticker_shutdown,
            )
        });

        let deps = LoopDeps {
            run_id,
            run_tag: run_id.simple().to_string()[..8].to_string(),
            max_consecutive_transport_errors: run_options.max_consecutive_transport_errors,
            factory: self.factory.clone(),
            reporter: reporter.clone(),
            event_sink: self.event_sink.clone(),
        };
        let handles = self.spawn_generators(&variants, &deps, &shutdown)?;
        let generators = self.collect_outcomes(run_id, handles).await;

        ticker_stop.trigger();
        if let Some(ticker) = ticker {
            if let Err(e) = ticker.await {
                tracing::warn!(error = %e, "progress reporter task ended abnormally");
            }
        }

        let summary = reporter.summary_lines().await;
        self.event_sink
            .emit(Event::Progress {
                run_id,
                lines: summary.clone(),
            })
            .await;

        let report = RunReport {
            run_id,
            cancelled: shutdown.is_triggered(),
            fail_on_generator_failure: run_options.fail_on_generator_failure,
            generators,
            stats: reporter.snapshot().await,
            summary,
        };
        self.event_sink
            .emit(Event::RunFinished {
                run_id,
                cancelled: report.cancelled,
                failed: report.failed_variants(),
            })
            .await;
        Ok(report)
    }

    fn spawn_generators(
        &self,
        variants: &[Variant],
        deps: &LoopDeps,
        shutdown: &Shutdown,
    ) -> Result<Vec<(Variant, JoinHandle<GeneratorOutcome>)>, CoordinatorError> {
        let mut handles = Vec::with_capacity(variants.len());
        for &variant in variants {
            let config = self.registry.config_for(variant)?.clone();
            let deps = deps.clone();
            let shutdown = shutdown.clone();
            let handle = tokio::spawn(async move { run_generator(config, deps, shutdown).await });
            handles.push((variant, handle));
        }
        Ok(handles)
    }

    async fn collect_outcomes(
        &self,
        run_id: Uuid,
        handles: Vec<(Variant, JoinHandle<GeneratorOutcome>)>,
    ) -> BTreeMap<Variant, GeneratorOutcome> {
        let mut outcomes = BTreeMap::new();
        for (variant, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let err = GeneratorError::Panicked(e.to_string());
                    tracing::error!(%variant, error = %err, "generator task did not complete");
                    self.event_sink
                        .emit(Event::GeneratorFailed {
                            run_id,
                            variant,
                            error: err.to_string(),
                        })
                        .await;
                    GeneratorOutcome {
                        variant,
                        status: GeneratorStatus::Failed,
                        packages_run: 0,
                        stop_reason: None,
                        error: Some(err.to_string()),
                    }
                }
            };
            outcomes.insert(variant, outcome);
        }
        outcomes
    }
}

fn spawn_ticker(
    run_id: Uuid,
    interval: Duration,
    reporter: Arc<ResultReporter>,
    event_sink: Arc<dyn EventSink>,
    stop: Shutdown,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticks = tokio::time::interval_at(start, interval);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    let lines = reporter.summary_lines().await;
                    event_sink.emit(Event::Progress { run_id, lines }).await;
                }
                _ = stop.triggered() => return,
            }
        }
    })
}
