use async_trait::async_trait;

use jobload_client::{JobBatch, JobQueueClient};
use jobload_core::Variant;

use crate::generator::{
    JobCounts, LoadGenerator, OpStep, OperationError, OperationErrorKind, OperationReport,
    PackageContext,
};

/// Submit `jobs_in_batch` jobs in one batch call, then cancel the whole group.
#[derive(Debug, Clone, Copy)]
pub struct BatchSubmitDropLoader {
    jobs_in_batch: u64,
}

impl BatchSubmitDropLoader {
    pub fn new(jobs_in_batch: u64) -> Self {
        Self {
            jobs_in_batch: jobs_in_batch.max(1),
        }
    }

    pub fn jobs_in_batch(&self) -> u64 {
        self.jobs_in_batch
    }
}

#[async_trait]
impl LoadGenerator for BatchSubmitDropLoader {
    fn variant(&self) -> Variant {
        Variant::BatchSubmitDrop
    }

    async fn run_operation(
        &self,
        client: &dyn JobQueueClient,
        ctx: &PackageContext,
        index: u64,
    ) -> OperationReport {
        let batch = JobBatch {
            group: ctx.batch_group(index),
            inputs: vec![ctx.job_input.clone(); self.jobs_in_batch as usize],
        };

        let ids = match client.submit_batch(&batch).await {
            Ok(ids) => ids,
            Err(e) => {
                return OperationReport::failed(
                    JobCounts::default(),
                    OperationError::client(OpStep::SubmitBatch, e),
                )
            }
        };
        let accepted = ids.len() as u64;

        if let Err(e) = client.drop_batch(&batch.group).await {
            return OperationReport::failed(
                JobCounts::submitted(accepted),
                OperationError::client(OpStep::DropBatch, e),
            );
        }

        let jobs = JobCounts::submitted(accepted).and_dropped(accepted);
        if accepted != self.jobs_in_batch {
            return OperationReport::failed(
                jobs,
                OperationError::new(
                    OpStep::SubmitBatch,
                    OperationErrorKind::ShortBatch {
                        expected: self.jobs_in_batch,
                        got: accepted,
                    },
                ),
            );
        }
        OperationReport::succeeded(jobs)
    }
}
