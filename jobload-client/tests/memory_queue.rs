use jobload_client::{ClientError, InMemoryJobQueue, JobBatch, JobInput, JobQueueClient, JobStatus};

#[tokio::test]
async fn full_lifecycle_reaches_confirmed() {
    let q = InMemoryJobQueue::default();
    let id = q.submit(&JobInput::new("payload")).await.unwrap();
    assert_eq!(q.status_of(&id).await, Some(JobStatus::Pending));

    let job = q.get().await.unwrap().expect("pending job");
    assert_eq!(job.id, id);
    assert_eq!(job.input, "payload");
    assert_eq!(q.status_of(&id).await, Some(JobStatus::Running));

    q.commit(&id, "done").await.unwrap();
    assert_eq!(q.output_of(&id).await.as_deref(), Some("done"));
    assert_eq!(q.read(&id).await.unwrap(), JobStatus::Done);
    assert_eq!(q.status_of(&id).await, Some(JobStatus::Reading));

    q.confirm(&id).await.unwrap();
    assert_eq!(q.status_of(&id).await, None);
    assert_eq!(q.count_with_status(JobStatus::Confirmed).await, 1);
    assert!(q.is_empty().await);
    assert!(q.get().await.unwrap().is_none());
}

#[tokio::test]
async fn dropped_jobs_are_not_handed_out() {
    let q = InMemoryJobQueue::default();
    let first = q.submit(&JobInput::new("a")).await.unwrap();
    let second = q.submit(&JobInput::new("b")).await.unwrap();
    q.drop_job(&first).await.unwrap();

    let job = q.get().await.unwrap().unwrap();
    assert_eq!(job.id, second);
    assert_eq!(q.status_of(&first).await, None);
    assert_eq!(q.count_with_status(JobStatus::Canceled).await, 1);
}

#[tokio::test]
async fn batch_submit_and_group_cancel() {
    let q = InMemoryJobQueue::default();
    let batch = JobBatch {
        group: "g1".to_string(),
        inputs: vec!["x".to_string(); 4],
    };
    let ids = q.submit_batch(&batch).await.unwrap();
    assert_eq!(ids.len(), 4);
    assert_eq!(q.count_with_status(JobStatus::Pending).await, 4);

    q.drop_batch("g1").await.unwrap();
    assert_eq!(q.count_with_status(JobStatus::Canceled).await, 4);
    assert!(q.is_empty().await);
    assert_eq!(q.pending_len().await, 0);

    let err = q.drop_batch("g1").await.unwrap_err();
    assert!(matches!(err, ClientError::Service { code, .. } if code == "eGroupNotFound"));
}

#[tokio::test]
async fn out_of_order_calls_are_service_errors() {
    let q = InMemoryJobQueue::default();
    let id = q.submit(&JobInput::new("a")).await.unwrap();

    let err = q.commit(&id, "x").await.unwrap_err();
    assert!(!err.is_transport());
    assert_eq!(q.read(&id).await.unwrap(), JobStatus::Pending);
    assert!(q.confirm(&id).await.is_err());
}

#[tokio::test]
async fn full_failure_rate_fails_every_call() {
    let q = InMemoryJobQueue::new(1.0);
    let err = q.submit(&JobInput::new("a")).await.unwrap_err();
    assert_eq!(err.kind(), "service");
    assert!(q.is_empty().await);
}

#[tokio::test]
async fn cancelled_jobs_are_released() {
    let q = InMemoryJobQueue::default();
    for _ in 0..10_000 {
        let id = q.submit(&JobInput::new("a")).await.unwrap();
        q.drop_job(&id).await.unwrap();
    }
    assert_eq!(q.len().await, 0);
    assert_eq!(q.pending_len().await, 0);
    assert_eq!(q.count_with_status(JobStatus::Canceled).await, 10_000);

    let kept = q.submit(&JobInput::new("b")).await.unwrap();
    assert_eq!(q.len().await, 1);
    assert_eq!(q.get().await.unwrap().map(|j| j.id), Some(kept));
}
