mod error;
mod trait_client;
mod types;

pub use error::ClientError;
pub use trait_client::JobQueueClient;
pub use types::{Job, JobBatch, JobId, JobInput, JobStatus};
