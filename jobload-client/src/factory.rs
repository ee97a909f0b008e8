use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use jobload_core::{TargetAddress, TargetConfig, Variant};

use crate::client::{ClientError, JobQueueClient};
use crate::memory::InMemoryJobQueue;
use crate::netschedule::{NetScheduleClient, NetScheduleConfig};

/// Hands each generator its own client.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn connect(&self, variant: Variant) -> Result<Arc<dyn JobQueueClient>, ClientError>;
}

/// Builds clients for the configured target address.
///
/// `memory://` targets get one queue per variant, shared by every connect for that variant.
pub struct TargetClientFactory {
    target: TargetConfig,
    memory_queues: Mutex<HashMap<Variant, Arc<InMemoryJobQueue>>>,
}

impl TargetClientFactory {
    pub fn new(target: TargetConfig) -> Self {
        Self {
            target,
            memory_queues: Mutex::new(HashMap::new()),
        }
    }

    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    /// The in-memory queue behind `variant`, once a generator connected to it.
    pub async fn memory_queue(&self, variant: Variant) -> Option<Arc<InMemoryJobQueue>> {
        self.memory_queues.lock().await.get(&variant).cloned()
    }
}

#[async_trait]
impl ClientFactory for TargetClientFactory {
    async fn connect(&self, variant: Variant) -> Result<Arc<dyn JobQueueClient>, ClientError> {
        match &self.target.address {
            TargetAddress::Memory { failure_rate } => {
                let mut queues = self.memory_queues.lock().await;
                let queue: Arc<dyn JobQueueClient> = queues
                    .entry(variant)
                    .or_insert_with(|| Arc::new(InMemoryJobQueue::new(*failure_rate)))
                    .clone();
                Ok(queue)
            }
            TargetAddress::NetSchedule { .. } => {
                let config = NetScheduleConfig::from_target(&self.target).ok_or_else(|| {
                    ClientError::Protocol("target is not a NetSchedule address".to_string())
                })?;
                tracing::info!(
                    %variant,
                    address = %self.target.address,
                    "connecting generator to queue"
                );
                let client: Arc<dyn JobQueueClient> =
                    Arc::new(NetScheduleClient::connect(config).await?);
                Ok(client)
            }
        }
    }
}
