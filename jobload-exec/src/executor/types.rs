use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use jobload_core::{GeneratorStatus, Variant};

use crate::executor::reporter::AggregateStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// All configured packages ran.
    Completed,
    Cancelled,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Completed => "completed",
            StopReason::Cancelled => "cancelled",
        }
    }
}

/// How one generator ended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOutcome {
    pub variant: Variant,
    pub status: GeneratorStatus,
    pub packages_run: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratorOutcome {
    pub fn is_failed(&self) -> bool {
        self.status == GeneratorStatus::Failed
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: Uuid,
    pub cancelled: bool,
    pub fail_on_generator_failure: bool,
    pub generators: BTreeMap<Variant, GeneratorOutcome>,
    pub stats: AggregateStats,
    pub summary: Vec<String>,
}

impl RunReport {
    pub fn failed_variants(&self) -> Vec<Variant> {
        self.generators
            .values()
            .filter(|g| g.is_failed())
            .map(|g| g.variant)
            .collect()
    }

    /// True when a generator failed and the run is configured to treat that as fatal.
    pub fn is_failure(&self) -> bool {
        self.fail_on_generator_failure && self.generators.values().any(|g| g.is_failed())
    }
}
