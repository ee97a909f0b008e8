use std::collections::BTreeMap;

use crate::types::{CountValue, DurationValue};

/// A load configuration document as read from JSON or YAML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSection>,

    /// Keyed by generator variant name (camelCase, snake_case or legacy loader name).
    #[serde(default)]
    pub generators: BTreeMap<String, GeneratorSection>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "clientName")]
    pub client_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<DurationValue>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "reportInterval")]
    pub report_interval: Option<DurationValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "failOnGeneratorFailure")]
    pub fail_on_generator_failure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "maxConsecutiveTransportErrors")]
    pub max_consecutive_transport_errors: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "packageSize")]
    pub package_size: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<DurationValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "packagesCount")]
    pub packages_count: Option<CountValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "jobsInBatch")]
    pub jobs_in_batch: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "pipelineDepth")]
    pub pipeline_depth: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "jobInput")]
    pub job_input: Option<String>,
}
