use async_trait::async_trait;

use jobload_client::{JobInput, JobQueueClient, JobStatus};
use jobload_core::Variant;

use crate::generator::{
    JobCounts, LoadGenerator, OpStep, OperationError, OperationErrorKind, OperationReport,
    PackageContext,
};

const JOB_OUTPUT: &str = "jobload-ok";

/// Drive one job through Submit, Get, Commit, Read and Confirm.
///
/// A job left behind by a failed step is abandoned; the queue expires it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleFullOkLoopLoader;

#[async_trait]
impl LoadGenerator for SingleFullOkLoopLoader {
    fn variant(&self) -> Variant {
        Variant::SingleFullOkLoop
    }

    async fn run_operation(
        &self,
        client: &dyn JobQueueClient,
        ctx: &PackageContext,
        _index: u64,
    ) -> OperationReport {
        if let Err(e) = client.submit(&JobInput::new(ctx.job_input.as_str())).await {
            return OperationReport::failed(
                JobCounts::default(),
                OperationError::client(OpStep::Submit, e),
            );
        }
        let submitted = JobCounts::submitted(1);

        // With pipelining the job handed back may be another operation's submission.
        let job = match client.get().await {
            Ok(Some(job)) => job,
            Ok(None) => {
                return OperationReport::failed(
                    submitted,
                    OperationError::new(OpStep::Get, OperationErrorKind::EmptyQueue),
                )
            }
            Err(e) => {
                return OperationReport::failed(submitted, OperationError::client(OpStep::Get, e))
            }
        };

        if let Err(e) = client.commit(&job.id, JOB_OUTPUT).await {
            return OperationReport::failed(submitted, OperationError::client(OpStep::Commit, e));
        }
        let committed = submitted.and_committed(1);

        match client.read(&job.id).await {
            Ok(JobStatus::Done) => {}
            Ok(other) => {
                return OperationReport::failed(
                    committed,
                    OperationError::new(OpStep::Read, OperationErrorKind::UnexpectedStatus(other)),
                )
            }
            Err(e) => {
                return OperationReport::failed(committed, OperationError::client(OpStep::Read, e))
            }
        }

        match client.confirm(&job.id).await {
            Ok(()) => OperationReport::succeeded(committed.and_confirmed(1)),
            Err(e) => {
                OperationReport::failed(committed, OperationError::client(OpStep::Confirm, e))
            }
        }
    }
}
