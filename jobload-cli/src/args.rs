use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Run-level settings that take precedence over the config file and `JOBLOAD_*` variables.
#[derive(Debug, Args, Clone, Default)]
pub struct OverrideArgs {
    /// Target queue address, e.g. `ns://localhost:9100/loadtest` or `memory://`.
    #[arg(long)]
    pub target: Option<String>,
    /// Periodic summary cadence such as `10s`; `0` prints only the final summary.
    #[arg(long)]
    pub report_interval: Option<String>,
    /// Exit 0 even when a generator failed.
    #[arg(long)]
    pub no_fail_on_generator_failure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventsMode {
    /// Drop run events.
    None,
    /// One JSON line per event on stdout.
    Stdout,
    /// Log events through the tracing subscriber.
    Log,
}
