use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Drive every enabled generator against the target until done or interrupted.
    Run {
        /// Config file (JSON or YAML). Without it the run is configured from `JOBLOAD_*` alone.
        path: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = EventsMode::Log)]
        events: EventsMode,
        #[command(flatten)]
        overrides: OverrideArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check a config file, including `JOBLOAD_*` overrides.
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List configured generators with their pacing settings.
    Generators {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}
