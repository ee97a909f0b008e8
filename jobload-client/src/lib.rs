#![forbid(unsafe_code)]

pub mod client;
pub mod factory;
pub mod memory;
pub mod netschedule;

pub use crate::client::{
    ClientError, Job, JobBatch, JobId, JobInput, JobQueueClient, JobStatus,
};
pub use crate::factory::{ClientFactory, TargetClientFactory};
pub use crate::memory::InMemoryJobQueue;
pub use crate::netschedule::{NetScheduleClient, NetScheduleConfig};
