use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use jobload_client::{
    ClientError, InMemoryJobQueue, Job, JobBatch, JobId, JobInput, JobQueueClient, JobStatus,
};
use jobload_core::{GeneratorConfig, PackagesCount, Variant};
use jobload_exec::{
    loader_for, run_package, ConnectivityGuard, OpStep, PackageContext, Shutdown,
};

fn config(variant: Variant, package_size: u64) -> GeneratorConfig {
    GeneratorConfig {
        variant,
        enabled: true,
        package_size,
        pause: Duration::ZERO,
        packages_count: PackagesCount::Finite(1),
        jobs_in_batch: variant.is_batched().then_some(32),
        pipeline_depth: 1,
        job_input: "payload".to_string(),
    }
}

/// Succeeds on everything except every `fail_every`-th submit.
#[derive(Default)]
struct ScriptedClient {
    fail_every: u64,
    submits: AtomicU64,
    drops: AtomicU64,
    batches: Mutex<Vec<JobBatch>>,
    dropped_groups: Mutex<Vec<String>>,
}

#[async_trait]
impl JobQueueClient for ScriptedClient {
    async fn submit(&self, _job: &JobInput) -> Result<JobId, ClientError> {
        let n = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_every > 0 && n % self.fail_every == 0 {
            return Err(ClientError::service("eInternalError", "scripted failure"));
        }
        Ok(JobId::new(format!("JSID_{n}")))
    }

    async fn drop_job(&self, _id: &JobId) -> Result<(), ClientError> {
        self.drops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn submit_batch(&self, batch: &JobBatch) -> Result<Vec<JobId>, ClientError> {
        self.batches.lock().await.push(batch.clone());
        Ok((0..batch.len()).map(|i| JobId::new(format!("B{i}"))).collect())
    }

    async fn drop_batch(&self, group: &str) -> Result<(), ClientError> {
        self.dropped_groups.lock().await.push(group.to_string());
        Ok(())
    }

    async fn get(&self) -> Result<Option<Job>, ClientError> {
        Ok(None)
    }

    async fn commit(&self, _id: &JobId, _output: &str) -> Result<(), ClientError> {
        Ok(())
    }

    async fn read(&self, _id: &JobId) -> Result<JobStatus, ClientError> {
        Ok(JobStatus::Done)
    }

    async fn confirm(&self, _id: &JobId) -> Result<(), ClientError> {
        Ok(())
    }
}

/// Every call fails at the transport level.
struct UnreachableClient {
    connect_errors: bool,
}

impl UnreachableClient {
    fn err(&self) -> ClientError {
        if self.connect_errors {
            ClientError::Connect {
                address: "127.0.0.1:1".to_string(),
                message: "connection refused".to_string(),
            }
        } else {
            ClientError::Transport("broken pipe".to_string())
        }
    }
}

#[async_trait]
impl JobQueueClient for UnreachableClient {
    async fn submit(&self, _job: &JobInput) -> Result<JobId, ClientError> {
        Err(self.err())
    }
    async fn drop_job(&self, _id: &JobId) -> Result<(), ClientError> {
        Err(self.err())
    }
    async fn submit_batch(&self, _batch: &JobBatch) -> Result<Vec<JobId>, ClientError> {
        Err(self.err())
    }
    async fn drop_batch(&self, _group: &str) -> Result<(), ClientError> {
        Err(self.err())
    }
    async fn get(&self) -> Result<Option<Job>, ClientError> {
        Err(self.err())
    }
    async fn commit(&self, _id: &JobId, _output: &str) -> Result<(), ClientError> {
        Err(self.err())
    }
    async fn read(&self, _id: &JobId) -> Result<JobStatus, ClientError> {
        Err(self.err())
    }
    async fn confirm(&self, _id: &JobId) -> Result<(), ClientError> {
        Err(self.err())
    }
}

#[tokio::test]
async fn submit_drop_counts_both_halves() {
    let cfg = config(Variant::SubmitDrop, 10);
    let client = ScriptedClient::default();
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &client, &ctx, &mut guard, &Shutdown::never()).await;
    assert_eq!(run.result.attempted, 10);
    assert_eq!(run.result.succeeded, 10);
    assert_eq!(run.result.failed, 0);
    assert_eq!(run.result.jobs.submitted, 10);
    assert_eq!(run.result.jobs.dropped, 10);
    assert!(!run.result.interrupted);
    assert_eq!(client.drops.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn submit_drop_failures_do_not_abort_the_package() {
    let cfg = config(Variant::SubmitDrop, 30);
    let client = ScriptedClient {
        fail_every: 3,
        ..Default::default()
    };
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &client, &ctx, &mut guard, &Shutdown::never()).await;
    assert_eq!(run.result.attempted, 30);
    assert_eq!(run.result.succeeded, 20);
    assert_eq!(run.result.failed, 10);
    assert!(run.connectivity.is_none());
    assert_eq!(run.result.errors.len(), 10);
    assert!(run.result.errors.iter().all(|e| e.step == OpStep::Submit));
    assert_eq!(run.result.errors[0].operation, 2);
}

#[tokio::test]
async fn batch_submit_drop_issues_one_batch_per_operation() {
    let cfg = config(Variant::BatchSubmitDrop, 5);
    let client = ScriptedClient::default();
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "run1", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &client, &ctx, &mut guard, &Shutdown::never()).await;
    assert_eq!(run.result.attempted, 5);
    assert_eq!(run.result.succeeded, 5);
    assert_eq!(run.result.jobs.submitted, 5 * 32);
    assert_eq!(run.result.jobs.dropped, 5 * 32);

    let batches = client.batches.lock().await;
    assert_eq!(batches.len(), 5);
    assert!(batches.iter().all(|b| b.len() == 32));
    let groups = client.dropped_groups.lock().await;
    let submitted: Vec<&str> = batches.iter().map(|b| b.group.as_str()).collect();
    let dropped: Vec<&str> = groups.iter().map(String::as_str).collect();
    assert_eq!(submitted, dropped);
}

#[tokio::test]
async fn full_ok_loop_against_memory_queue() {
    let mut cfg = config(Variant::SingleFullOkLoop, 25);
    cfg.pipeline_depth = 4;
    let queue = InMemoryJobQueue::default();
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &queue, &ctx, &mut guard, &Shutdown::never()).await;
    assert_eq!(run.result.succeeded, 25);
    assert_eq!(run.result.failed, 0);
    assert_eq!(run.result.jobs.committed, 25);
    assert_eq!(run.result.jobs.confirmed, 25);
    assert_eq!(queue.count_with_status(JobStatus::Confirmed).await, 25);
}

#[tokio::test]
async fn full_ok_loop_reports_empty_queue() {
    let cfg = config(Variant::SingleFullOkLoop, 3);
    let client = ScriptedClient::default();
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &client, &ctx, &mut guard, &Shutdown::never()).await;
    assert_eq!(run.result.failed, 3);
    assert!(run
        .result
        .errors
        .iter()
        .all(|e| e.step == OpStep::Get && e.kind == "emptyQueue"));
    // Submits succeeded even though the operations failed.
    assert_eq!(run.result.jobs.submitted, 3);
    assert_eq!(run.result.jobs.confirmed, 0);
    assert_eq!(guard.consecutive(), 0);
}

#[tokio::test]
async fn errors_are_ordered_by_operation_when_pipelined() {
    let mut cfg = config(Variant::SubmitDrop, 40);
    cfg.pipeline_depth = 8;
    let client = ScriptedClient {
        fail_every: 2,
        ..Default::default()
    };
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &client, &ctx, &mut guard, &Shutdown::never()).await;
    assert_eq!(run.result.attempted, 40);
    assert_eq!(run.result.failed, 20);
    let ops: Vec<u64> = run.result.errors.iter().map(|e| e.operation).collect();
    let mut sorted = ops.clone();
    sorted.sort();
    assert_eq!(ops, sorted);
}

#[tokio::test]
async fn transport_failures_trip_the_guard_at_threshold() {
    let cfg = config(Variant::SubmitDrop, 100);
    let client = UnreachableClient {
        connect_errors: false,
    };
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &client, &ctx, &mut guard, &Shutdown::never()).await;
    let err = run.connectivity.expect("guard should trip");
    assert_eq!(err.consecutive, 5);
    assert_eq!(run.result.attempted, 5);
    assert_eq!(run.result.failed, 5);
    assert!(run.result.interrupted);
}

#[tokio::test]
async fn guard_tripping_on_the_last_operation_interrupts_the_package() {
    let cfg = config(Variant::SubmitDrop, 5);
    let client = UnreachableClient {
        connect_errors: false,
    };
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &client, &ctx, &mut guard, &Shutdown::never()).await;
    assert!(run.connectivity.is_some());
    assert_eq!(run.result.attempted, 5);
    assert!(run.result.interrupted);
}

#[tokio::test]
async fn connect_failure_before_first_success_trips_immediately() {
    let cfg = config(Variant::SubmitDrop, 100);
    let client = UnreachableClient {
        connect_errors: true,
    };
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);

    let run = run_package(loader.as_ref(), &client, &ctx, &mut guard, &Shutdown::never()).await;
    assert!(run.connectivity.is_some());
    assert_eq!(run.result.attempted, 1);
}

#[tokio::test]
async fn triggered_shutdown_dispatches_nothing() {
    let cfg = config(Variant::SubmitDrop, 10);
    let client = Arc::new(ScriptedClient::default());
    let loader = loader_for(&cfg);
    let ctx = PackageContext::new(&cfg, "t", 1);
    let mut guard = ConnectivityGuard::new(5);
    let (trigger, shutdown) = jobload_exec::shutdown_channel();
    trigger.trigger();

    let run = run_package(loader.as_ref(), client.as_ref(), &ctx, &mut guard, &shutdown).await;
    assert_eq!(run.result.attempted, 0);
    assert!(run.result.interrupted);
    assert_eq!(client.submits.load(Ordering::SeqCst), 0);
}
