mod client;
mod connection;
pub mod protocol;

pub use client::{NetScheduleClient, NetScheduleConfig};
