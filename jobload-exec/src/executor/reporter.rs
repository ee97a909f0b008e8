use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use jobload_core::Variant;

use crate::generator::{JobCounts, PackageResult};

/// Running totals for one variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantTotals {
    /// Fully executed packages.
    pub packages: u64,
    pub partial_packages: u64,
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub jobs: JobCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl VariantTotals {
    fn fold(&mut self, result: &PackageResult) {
        if result.interrupted {
            self.partial_packages += 1;
        } else {
            self.packages += 1;
        }
        self.attempted += result.attempted;
        self.succeeded += result.succeeded;
        self.failed += result.failed;
        self.jobs += result.jobs;
        if let Some(last) = result.errors.last() {
            self.last_error = Some(last.message.clone());
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub per_variant: BTreeMap<Variant, VariantTotals>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AggregateStats {
    pub fn new(variants: impl IntoIterator<Item = Variant>) -> Self {
        let now = Utc::now();
        Self {
            per_variant: variants
                .into_iter()
                .map(|v| (v, VariantTotals::default()))
                .collect(),
            started_at: now,
            updated_at: now,
        }
    }

    pub fn totals(&self, variant: Variant) -> Option<&VariantTotals> {
        self.per_variant.get(&variant)
    }

    pub fn total_attempted(&self) -> u64 {
        self.per_variant.values().map(|t| t.attempted).sum()
    }

    pub fn total_succeeded(&self) -> u64 {
        self.per_variant.values().map(|t| t.succeeded).sum()
    }

    pub fn total_failed(&self) -> u64 {
        self.per_variant.values().map(|t| t.failed).sum()
    }
}

/// Owner of the run's [`AggregateStats`]. All updates go through [`ResultReporter::record`].
pub struct ResultReporter {
    stats: Arc<Mutex<AggregateStats>>,
    started: Instant,
}

impl ResultReporter {
    pub fn new(variants: impl IntoIterator<Item = Variant>) -> Self {
        Self {
            stats: Arc::new(Mutex::new(AggregateStats::new(variants))),
            started: Instant::now(),
        }
    }

    /// Fold one package into the totals of `variant`.
    pub async fn record(&self, variant: Variant, result: &PackageResult) {
        let mut stats = self.stats.lock().await;
        stats.per_variant.entry(variant).or_default().fold(result);
        stats.updated_at = Utc::now();
    }

    pub async fn snapshot(&self) -> AggregateStats {
        self.stats.lock().await.clone()
    }

    pub async fn summary_line(&self, variant: Variant) -> String {
        let totals = self
            .stats
            .lock()
            .await
            .totals(variant)
            .cloned()
            .unwrap_or_default();
        format_summary(variant, &totals, self.started.elapsed().as_secs_f64())
    }

    /// One summary line per variant, in variant order.
    pub async fn summary_lines(&self) -> Vec<String> {
        let stats = self.snapshot().await;
        let elapsed = self.started.elapsed().as_secs_f64();
        stats
            .per_variant
            .iter()
            .map(|(variant, totals)| format_summary(*variant, totals, elapsed))
            .collect()
    }
}

fn format_summary(variant: Variant, totals: &VariantTotals, elapsed_secs: f64) -> String {
    let mut line = format!(
        "{variant}: packages={} attempted={} succeeded={} failed={} submitted={} dropped={} \
         committed={} confirmed={} elapsed={elapsed_secs:.1}s",
        totals.packages,
        totals.attempted,
        totals.succeeded,
        totals.failed,
        totals.jobs.submitted,
        totals.jobs.dropped,
        totals.jobs.committed,
        totals.jobs.confirmed,
    );
    if totals.partial_packages > 0 {
        line.push_str(&format!(" partial={}", totals.partial_packages));
    }
    line
}
