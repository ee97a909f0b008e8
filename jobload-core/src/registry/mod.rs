use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::ConfigError;
use crate::types::{LoadDocument, PackagesCount, Variant};
use crate::validate::lower_document;

pub const DEFAULT_CLIENT_NAME: &str = "jobload";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_CONSECUTIVE_TRANSPORT_ERRORS: u32 = 5;
pub const DEFAULT_PIPELINE_DEPTH: usize = 1;
pub const DEFAULT_JOB_INPUT: &str = "jobload";
pub const MAX_JOBS_IN_BATCH: u64 = 10_000;

/// Immutable settings for one generator variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub variant: Variant,
    pub enabled: bool,
    /// Operations per package. For the batch variant this is the number of batch-submit calls.
    pub package_size: u64,
    #[serde(rename = "pauseMs", serialize_with = "serialize_millis")]
    pub pause: Duration,
    pub packages_count: PackagesCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs_in_batch: Option<u64>,
    pub pipeline_depth: usize,
    pub job_input: String,
}

impl GeneratorConfig {
    /// Jobs submitted by one successful operation.
    pub fn jobs_per_operation(&self) -> u64 {
        self.jobs_in_batch.unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetAddress {
    /// Process-local queue, optionally failing a share of calls.
    Memory { failure_rate: f64 },
    NetSchedule {
        host: String,
        port: u16,
        queue: String,
    },
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetAddress::Memory { failure_rate } if *failure_rate > 0.0 => {
                write!(f, "memory://?failure_rate={failure_rate}")
            }
            TargetAddress::Memory { .. } => f.write_str("memory://"),
            TargetAddress::NetSchedule { host, port, queue } => {
                write!(f, "ns://{host}:{port}/{queue}")
            }
        }
    }
}

impl Serialize for TargetAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    pub address: TargetAddress,
    pub client_name: String,
    #[serde(rename = "timeoutMs", serialize_with = "serialize_millis")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    /// `None` means only the final summary is produced.
    #[serde(rename = "reportIntervalMs", serialize_with = "serialize_opt_millis")]
    pub report_interval: Option<Duration>,
    pub fail_on_generator_failure: bool,
    pub max_consecutive_transport_errors: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            report_interval: None,
            fail_on_generator_failure: true,
            max_consecutive_transport_errors: DEFAULT_MAX_CONSECUTIVE_TRANSPORT_ERRORS,
        }
    }
}

fn serialize_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(d.as_millis())
}

fn serialize_opt_millis<S: Serializer>(
    d: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => serializer.serialize_u128(d.as_millis()),
        None => serializer.serialize_none(),
    }
}

/// Which generator variants a run drives, and with what settings. Built once at start-up.
#[derive(Debug, Clone)]
pub struct GeneratorRegistry {
    target: TargetConfig,
    run: RunOptions,
    generators: BTreeMap<Variant, GeneratorConfig>,
}

impl GeneratorRegistry {
    pub fn from_document(doc: &LoadDocument) -> Result<Self, ConfigError> {
        let lowered = lower_document(doc)?;
        Ok(Self {
            target: lowered.target,
            run: lowered.run,
            generators: lowered.generators,
        })
    }

    pub fn new(
        target: TargetConfig,
        run: RunOptions,
        generators: impl IntoIterator<Item = GeneratorConfig>,
    ) -> Self {
        Self {
            target,
            run,
            generators: generators.into_iter().map(|g| (g.variant, g)).collect(),
        }
    }

    pub fn enabled_variants(&self) -> BTreeSet<Variant> {
        self.generators
            .values()
            .filter(|g| g.enabled)
            .map(|g| g.variant)
            .collect()
    }

    pub fn config_for(&self, variant: Variant) -> Result<&GeneratorConfig, ConfigError> {
        self.generators
            .get(&variant)
            .ok_or(ConfigError::NotConfigured(variant))
    }

    pub fn config_for_name(&self, name: &str) -> Result<&GeneratorConfig, ConfigError> {
        let variant: Variant = name
            .parse()
            .map_err(|_| ConfigError::UnknownVariant(name.to_string()))?;
        self.config_for(variant)
    }

    /// Every configured generator, enabled or not, in variant order.
    pub fn configured(&self) -> impl Iterator<Item = &GeneratorConfig> {
        self.generators.values()
    }

    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    pub fn run_options(&self) -> &RunOptions {
        &self.run
    }

    pub fn ensure_runnable(&self) -> Result<(), ConfigError> {
        if self.generators.values().any(|g| g.enabled) {
            Ok(())
        } else {
            Err(ConfigError::NoneEnabled)
        }
    }
}
