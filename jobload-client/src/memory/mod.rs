//! Process-local job queue for dry runs and tests.

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::client::{ClientError, Job, JobBatch, JobId, JobInput, JobQueueClient, JobStatus};

#[derive(Debug)]
struct StoredJob {
    input: String,
    status: JobStatus,
    output: Option<String>,
    auth_token: Option<String>,
}

#[derive(Debug, Default)]
struct QueueState {
    jobs: HashMap<JobId, StoredJob>,
    pending: VecDeque<JobId>,
    groups: HashMap<String, Vec<JobId>>,
    /// Jobs that reached Canceled or Confirmed are removed and only counted here.
    finished: HashMap<JobStatus, usize>,
}

impl QueueState {
    fn insert(&mut self, input: &str) -> JobId {
        let id = JobId::new(format!("JL_{}", Uuid::new_v4().simple()));
        self.jobs.insert(
            id.clone(),
            StoredJob {
                input: input.to_string(),
                status: JobStatus::Pending,
                output: None,
                auth_token: None,
            },
        );
        self.pending.push_back(id.clone());
        id
    }

    fn job_mut(&mut self, id: &JobId) -> Result<&mut StoredJob, ClientError> {
        self.jobs
            .get_mut(id)
            .ok_or_else(|| ClientError::service("eJobNotFound", format!("job {id} not found")))
    }

    fn retire(&mut self, ids: &HashSet<JobId>, status: JobStatus) {
        for id in ids {
            if self.jobs.remove(id).is_some() {
                *self.finished.entry(status).or_default() += 1;
            }
        }
        self.pending.retain(|id| !ids.contains(id));
    }
}

/// Job queue living in process memory, with the full Pending → Running → Done → Reading →
/// Confirmed lifecycle. A non-zero failure rate makes that share of calls fail with a
/// service error.
#[derive(Debug)]
pub struct InMemoryJobQueue {
    state: Mutex<QueueState>,
    failure_rate: f64,
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl InMemoryJobQueue {
    pub fn new(failure_rate: f64) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    /// Status of a live job. Cancelled and confirmed jobs are no longer tracked.
    pub async fn status_of(&self, id: &JobId) -> Option<JobStatus> {
        self.state.lock().await.jobs.get(id).map(|j| j.status)
    }

    pub async fn output_of(&self, id: &JobId) -> Option<String> {
        self.state
            .lock()
            .await
            .jobs
            .get(id)
            .and_then(|j| j.output.clone())
    }

    pub async fn count_with_status(&self, status: JobStatus) -> usize {
        let state = self.state.lock().await;
        let live = state.jobs.values().filter(|j| j.status == status).count();
        live + state.finished.get(&status).copied().unwrap_or(0)
    }

    /// Number of live jobs, excluding cancelled and confirmed ones.
    pub async fn len(&self) -> usize {
        self.state.lock().await.jobs.len()
    }

    pub async fn pending_len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn inject_fault(&self, op: &str) -> Result<(), ClientError> {
        if self.failure_rate > 0.0 && fastrand::f64() < self.failure_rate {
            return Err(ClientError::service(
                "eInjectedFault",
                format!("{op} failed by fault injection"),
            ));
        }
        Ok(())
    }
}

fn invalid_status(id: &JobId, status: JobStatus, op: &str) -> ClientError {
    ClientError::service(
        "eInvalidJobStatus",
        format!("cannot {op} job {id} in status {status}"),
    )
}

#[async_trait]
impl JobQueueClient for InMemoryJobQueue {
    async fn submit(&self, job: &JobInput) -> Result<JobId, ClientError> {
        self.inject_fault("submit")?;
        Ok(self.state.lock().await.insert(&job.input))
    }

    async fn drop_job(&self, id: &JobId) -> Result<(), ClientError> {
        self.inject_fault("cancel")?;
        let mut state = self.state.lock().await;
        state.job_mut(id)?;
        state.retire(&HashSet::from([id.clone()]), JobStatus::Canceled);
        Ok(())
    }

    async fn submit_batch(&self, batch: &JobBatch) -> Result<Vec<JobId>, ClientError> {
        self.inject_fault("batch submit")?;
        if batch.is_empty() {
            return Err(ClientError::service("eInvalidParameter", "empty batch"));
        }
        let mut state = self.state.lock().await;
        let ids: Vec<JobId> = batch.inputs.iter().map(|i| state.insert(i)).collect();
        state
            .groups
            .entry(batch.group.clone())
            .or_default()
            .extend(ids.iter().cloned());
        Ok(ids)
    }

    async fn drop_batch(&self, group: &str) -> Result<(), ClientError> {
        self.inject_fault("group cancel")?;
        let mut state = self.state.lock().await;
        let Some(ids) = state.groups.remove(group) else {
            return Err(ClientError::service(
                "eGroupNotFound",
                format!("group {group} not found"),
            ));
        };
        let ids: HashSet<JobId> = ids.into_iter().collect();
        state.retire(&ids, JobStatus::Canceled);
        Ok(())
    }

    async fn get(&self) -> Result<Option<Job>, ClientError> {
        self.inject_fault("get")?;
        let mut state = self.state.lock().await;
        while let Some(id) = state.pending.pop_front() {
            if let Some(job) = state.jobs.get_mut(&id) {
                if job.status == JobStatus::Pending {
                    job.status = JobStatus::Running;
                    let input = job.input.clone();
                    return Ok(Some(Job { id, input }));
                }
            }
        }
        Ok(None)
    }

    async fn commit(&self, id: &JobId, output: &str) -> Result<(), ClientError> {
        self.inject_fault("put")?;
        let mut state = self.state.lock().await;
        let job = state.job_mut(id)?;
        if job.status != JobStatus::Running {
            return Err(invalid_status(id, job.status, "commit"));
        }
        job.status = JobStatus::Done;
        job.output = Some(output.to_string());
        Ok(())
    }

    async fn read(&self, id: &JobId) -> Result<JobStatus, ClientError> {
        self.inject_fault("read")?;
        let mut state = self.state.lock().await;
        let job = state.job_mut(id)?;
        let status = job.status;
        if status == JobStatus::Done {
            job.status = JobStatus::Reading;
            job.auth_token = Some(Uuid::new_v4().simple().to_string());
        }
        Ok(status)
    }

    async fn confirm(&self, id: &JobId) -> Result<(), ClientError> {
        self.inject_fault("confirm")?;
        let mut state = self.state.lock().await;
        let job = state.job_mut(id)?;
        if job.status != JobStatus::Reading || job.auth_token.is_none() {
            return Err(invalid_status(id, job.status, "confirm"));
        }
        state.retire(&HashSet::from([id.clone()]), JobStatus::Confirmed);
        Ok(())
    }
}
