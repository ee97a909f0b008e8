use async_trait::async_trait;

use jobload_client::{JobInput, JobQueueClient};
use jobload_core::Variant;

use crate::generator::{
    JobCounts, LoadGenerator, OpStep, OperationError, OperationReport, PackageContext,
};

/// Submit one job, then cancel it straight away.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitDropLoader;

#[async_trait]
impl LoadGenerator for SubmitDropLoader {
    fn variant(&self) -> Variant {
        Variant::SubmitDrop
    }

    async fn run_operation(
        &self,
        client: &dyn JobQueueClient,
        ctx: &PackageContext,
        _index: u64,
    ) -> OperationReport {
        let id = match client.submit(&JobInput::new(ctx.job_input.as_str())).await {
            Ok(id) => id,
            Err(e) => {
                return OperationReport::failed(
                    JobCounts::default(),
                    OperationError::client(OpStep::Submit, e),
                )
            }
        };
        match client.drop_job(&id).await {
            Ok(()) => OperationReport::succeeded(JobCounts::submitted(1).and_dropped(1)),
            Err(e) => OperationReport::failed(
                JobCounts::submitted(1),
                OperationError::client(OpStep::Drop, e),
            ),
        }
    }
}
