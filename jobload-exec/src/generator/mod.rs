mod batch_submit_drop;
mod connectivity;
mod driver;
mod full_ok_loop;
mod outcome;
mod submit_drop;

use async_trait::async_trait;

use jobload_client::JobQueueClient;
use jobload_core::{GeneratorConfig, Variant};

pub use batch_submit_drop::BatchSubmitDropLoader;
pub use connectivity::{ConnectivityError, ConnectivityGuard};
pub use driver::{run_package, PackageRun};
pub use full_ok_loop::SingleFullOkLoopLoader;
pub use outcome::{
    ErrorRecord, JobCounts, OpStep, OperationError, OperationErrorKind, OperationReport,
    PackageResult,
};
pub use submit_drop::SubmitDropLoader;

/// One pattern of synthetic load. A package is `package_size` calls to `run_operation`.
#[async_trait]
pub trait LoadGenerator: Send + Sync {
    fn variant(&self) -> Variant;

    /// Run operation `index` of the package described by `ctx`. Never aborts the package:
    /// failures are reported in the returned value.
    async fn run_operation(
        &self,
        client: &dyn JobQueueClient,
        ctx: &PackageContext,
        index: u64,
    ) -> OperationReport;
}

pub fn loader_for(config: &GeneratorConfig) -> Box<dyn LoadGenerator> {
    match config.variant {
        Variant::SubmitDrop => Box::new(SubmitDropLoader),
        Variant::BatchSubmitDrop => Box::new(BatchSubmitDropLoader::new(
            config.jobs_per_operation(),
        )),
        Variant::SingleFullOkLoop => Box::new(SingleFullOkLoopLoader),
    }
}

/// Settings for one package execution.
#[derive(Debug, Clone)]
pub struct PackageContext {
    pub variant: Variant,
    /// One-based number of this package within the generator's run.
    pub package_no: u64,
    pub package_size: u64,
    pub pipeline_depth: usize,
    pub job_input: String,
    /// Short tag unique to the run, used to name job groups.
    pub run_tag: String,
}

impl PackageContext {
    pub fn new(config: &GeneratorConfig, run_tag: &str, package_no: u64) -> Self {
        Self {
            variant: config.variant,
            package_no,
            package_size: config.package_size,
            pipeline_depth: config.pipeline_depth.max(1),
            job_input: config.job_input.clone(),
            run_tag: run_tag.to_string(),
        }
    }

    pub fn batch_group(&self, index: u64) -> String {
        format!(
            "{}_{}_{}_{}",
            self.run_tag,
            self.variant.as_str(),
            self.package_no,
            index
        )
    }
}
