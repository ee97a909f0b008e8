use async_trait::async_trait;

use crate::client::types::*;
use crate::client::ClientError;

/// Calls a load generator makes against the job queue.
#[async_trait]
pub trait JobQueueClient: Send + Sync {
    async fn submit(&self, job: &JobInput) -> Result<JobId, ClientError>;

    /// Cancel a single job.
    async fn drop_job(&self, id: &JobId) -> Result<(), ClientError>;

    /// Submit every input of `batch` in one call. Returned ids follow input order.
    async fn submit_batch(&self, batch: &JobBatch) -> Result<Vec<JobId>, ClientError>;

    /// Cancel every job submitted under `group`.
    async fn drop_batch(&self, group: &str) -> Result<(), ClientError>;

    /// Take the next pending job, if any.
    async fn get(&self) -> Result<Option<Job>, ClientError>;

    async fn commit(&self, id: &JobId, output: &str) -> Result<(), ClientError>;

    async fn read(&self, id: &JobId) -> Result<JobStatus, ClientError>;

    async fn confirm(&self, id: &JobId) -> Result<(), ClientError>;
}
