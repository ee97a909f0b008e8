#![forbid(unsafe_code)]

//! Configuration model for jobload: the load document, its validation, the generator
//! registry built from it, and the pacing policy each generator loop consults.

pub mod env;
pub mod error;
pub mod pacing;
pub mod parser;
pub mod registry;
pub mod types;
pub mod validate;

pub use crate::env::{apply_env_overrides, process_env};
pub use crate::error::{ConfigError, ParseError, ValidationError, Violation};
pub use crate::pacing::{GeneratorState, GeneratorStatus, PacingPolicy, TransitionError};
pub use crate::parser::{parse_config_str, ConfigFormat, ParsedConfig};
pub use crate::registry::{
    GeneratorConfig, GeneratorRegistry, RunOptions, TargetAddress, TargetConfig,
    MAX_JOBS_IN_BATCH,
};
pub use crate::types::{
    parse_duration, CountValue, DurationParseError, DurationValue, GeneratorSection,
    LoadDocument, PackagesCount, RunSection, TargetSection, Variant,
};
pub use crate::validate::{lower_document, validate_document, ValidatedConfig};
