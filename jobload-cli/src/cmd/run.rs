use std::path::Path;
use std::sync::Arc;

use jobload_client::TargetClientFactory;
use jobload_exec::{
    shutdown_channel, CompositeEventSink, Coordinator, CoordinatorError, NoOpEventSink,
    StdoutEventSink, TracingEventSink,
};

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::{EventsMode, OutputArgs, OverrideArgs};

use super::config::{apply_cli_overrides, build_registry, load_document, report_config_error};
use super::progress::ProgressEventSink;

pub async fn run_cmd(
    path: Option<&Path>,
    events: EventsMode,
    overrides: OverrideArgs,
    output: OutputArgs,
) -> i32 {
    let mut document = match load_document(path, &output) {
        Ok(d) => d,
        Err(code) => return code,
    };
    apply_cli_overrides(&mut document, &overrides);
    let registry = match build_registry(&document, &output) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let factory = Arc::new(TargetClientFactory::new(registry.target().clone()));

    let mut sink = CompositeEventSink::new();
    match events {
        EventsMode::None => sink.add(Arc::new(NoOpEventSink)),
        EventsMode::Stdout => sink.add(Arc::new(StdoutEventSink)),
        EventsMode::Log => sink.add(Arc::new(TracingEventSink)),
    }
    // The tracing sink already logs progress lines.
    if events != EventsMode::Log && output.format == OutputFormat::Text && !output.quiet {
        sink.add(Arc::new(ProgressEventSink::new()));
    }

    let (trigger, shutdown) = shutdown_channel();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping generators");
            trigger.trigger();
        }
    });

    let coordinator = Coordinator::new(registry, factory, Arc::new(sink));
    let result = coordinator.run(shutdown).await;
    signal_task.abort();

    let report = match result {
        Ok(r) => r,
        Err(CoordinatorError::Config(e)) => {
            report_config_error(&output, &e);
            return exit_codes::VALIDATION_FAILED;
        }
    };

    if output.format == OutputFormat::Text && !output.quiet {
        for line in &report.summary {
            println!("{line}");
        }
        for outcome in report.generators.values().filter(|g| g.is_failed()) {
            eprintln!(
                "error: generator {} failed: {}",
                outcome.variant,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
        if report.cancelled {
            eprintln!("run cancelled");
        }
    } else {
        print_result(output.format, output.quiet, &report);
    }

    if report.is_failure() {
        exit_codes::RUN_FAILED
    } else {
        exit_codes::SUCCESS
    }
}
