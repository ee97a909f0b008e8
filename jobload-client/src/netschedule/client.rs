use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use jobload_core::{TargetAddress, TargetConfig};

use crate::client::{ClientError, Job, JobBatch, JobId, JobInput, JobQueueClient, JobStatus};

use super::connection::Connection;
use super::protocol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetScheduleConfig {
    pub host: String,
    pub port: u16,
    pub queue: String,
    pub client_name: String,
    pub timeout: Duration,
}

impl NetScheduleConfig {
    /// `None` when the target is not a NetSchedule address.
    pub fn from_target(target: &TargetConfig) -> Option<Self> {
        match &target.address {
            TargetAddress::NetSchedule { host, port, queue } => Some(Self {
                host: host.clone(),
                port: *port,
                queue: queue.clone(),
                client_name: target.client_name.clone(),
                timeout: target.timeout,
            }),
            TargetAddress::Memory { .. } => None,
        }
    }
}

/// Client for one queue on a NetSchedule-style server.
///
/// Holds a single connection; calls on one client are serialised. After a transport failure
/// the connection is discarded and the next call reconnects.
pub struct NetScheduleClient {
    config: NetScheduleConfig,
    conn: Mutex<Option<Connection>>,
    // READ hands out an auth token that CFRM must echo back.
    auth_tokens: Mutex<HashMap<JobId, String>>,
}

impl NetScheduleClient {
    pub fn new(config: NetScheduleConfig) -> Self {
        Self {
            config,
            conn: Mutex::new(None),
            auth_tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Create a client and open its connection right away.
    pub async fn connect(config: NetScheduleConfig) -> Result<Self, ClientError> {
        let client = Self::new(config);
        {
            let mut conn = client.conn.lock().await;
            let opened = tokio::time::timeout(client.config.timeout, client.open())
                .await
                .map_err(|_| ClientError::Connect {
                    address: client.address(),
                    message: format!("timed out after {:?}", client.config.timeout),
                })??;
            *conn = Some(opened);
        }
        Ok(client)
    }

    pub fn config(&self) -> &NetScheduleConfig {
        &self.config
    }

    fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    async fn open(&self) -> Result<Connection, ClientError> {
        Connection::open(
            &self.config.host,
            self.config.port,
            &self.config.client_name,
            &self.config.queue,
        )
        .await
    }

    async fn request_on(
        &self,
        slot: &mut Option<Connection>,
        lines: &[String],
    ) -> Result<protocol::Reply, ClientError> {
        if slot.is_none() {
            tracing::debug!(address = %self.address(), "opening queue connection");
            *slot = Some(self.open().await?);
        }
        match slot.as_mut() {
            Some(conn) => conn.request(lines).await,
            None => Err(ClientError::Transport("no connection".to_string())),
        }
    }

    async fn call(&self, lines: Vec<String>) -> Result<String, ClientError> {
        let mut guard = self.conn.lock().await;
        let outcome = tokio::time::timeout(self.config.timeout, self.request_on(&mut guard, &lines))
            .await
            .unwrap_or(Err(ClientError::Timeout(self.config.timeout)));

        match outcome {
            Ok(reply) => reply.into_result(),
            Err(e) => {
                // The stream may hold a half-read reply; start over on the next call.
                *guard = None;
                tracing::debug!(error = %e, "dropping queue connection");
                Err(e)
            }
        }
    }
}

fn require_key(payload: &str, what: &str) -> Result<JobId, ClientError> {
    let key = payload.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(ClientError::Protocol(format!(
            "{what} reply carries no job key: {payload:?}"
        )));
    }
    Ok(JobId::new(key))
}

#[async_trait]
impl JobQueueClient for NetScheduleClient {
    async fn submit(&self, job: &JobInput) -> Result<JobId, ClientError> {
        let payload = self.call(vec![protocol::submit(&job.input)]).await?;
        require_key(&payload, "SUBMIT")
    }

    async fn drop_job(&self, id: &JobId) -> Result<(), ClientError> {
        self.call(vec![protocol::cancel_job(id.as_str())]).await?;
        Ok(())
    }

    async fn submit_batch(&self, batch: &JobBatch) -> Result<Vec<JobId>, ClientError> {
        let payload = self
            .call(protocol::batch_submit(&batch.group, &batch.inputs))
            .await?;
        let ids: Vec<JobId> = payload.split_whitespace().map(JobId::new).collect();
        if ids.len() != batch.len() {
            return Err(ClientError::Protocol(format!(
                "batch of {} jobs acknowledged with {} keys",
                batch.len(),
                ids.len()
            )));
        }
        Ok(ids)
    }

    async fn drop_batch(&self, group: &str) -> Result<(), ClientError> {
        self.call(vec![protocol::cancel_group(group)]).await?;
        Ok(())
    }

    async fn get(&self) -> Result<Option<Job>, ClientError> {
        let payload = self.call(vec![protocol::get()]).await?;
        if payload.trim().is_empty() {
            return Ok(None);
        }
        let mut pairs = protocol::parse_pairs(&payload);
        let key = pairs.remove("job_key").ok_or_else(|| {
            ClientError::Protocol(format!("GET reply without job_key: {payload:?}"))
        })?;
        Ok(Some(Job {
            id: JobId::new(key),
            input: pairs.remove("input").unwrap_or_default(),
        }))
    }

    async fn commit(&self, id: &JobId, output: &str) -> Result<(), ClientError> {
        self.call(vec![protocol::put(id.as_str(), output)]).await?;
        Ok(())
    }

    async fn read(&self, id: &JobId) -> Result<JobStatus, ClientError> {
        let payload = self.call(vec![protocol::read(id.as_str())]).await?;
        let pairs = protocol::parse_pairs(&payload);
        let status: JobStatus = pairs
            .get("status")
            .ok_or_else(|| {
                ClientError::Protocol(format!("READ reply without status: {payload:?}"))
            })?
            .parse()
            .map_err(ClientError::Protocol)?;
        if let Some(token) = pairs.get("auth_token").filter(|t| !t.is_empty()) {
            self.auth_tokens
                .lock()
                .await
                .insert(id.clone(), token.clone());
        }
        Ok(status)
    }

    async fn confirm(&self, id: &JobId) -> Result<(), ClientError> {
        let token = self.auth_tokens.lock().await.remove(id).ok_or_else(|| {
            ClientError::service("eNoAuthToken", format!("job {id} was not read before confirm"))
        })?;
        self.call(vec![protocol::confirm(id.as_str(), &token)]).await?;
        Ok(())
    }
}
