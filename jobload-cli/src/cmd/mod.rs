pub mod config;
pub mod generators;
pub mod progress;
pub mod run;
pub mod validate;
