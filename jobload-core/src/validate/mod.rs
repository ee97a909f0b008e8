mod rules;
mod validator;

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::registry::{GeneratorConfig, RunOptions, TargetConfig};
use crate::types::{LoadDocument, Variant};
use validator::Validator;

/// A document that passed validation, lowered to its immutable runtime values.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub target: TargetConfig,
    pub run: RunOptions,
    pub generators: BTreeMap<Variant, GeneratorConfig>,
}

pub fn validate_document(doc: &LoadDocument) -> Result<(), ValidationError> {
    lower_document(doc).map(|_| ())
}

pub fn lower_document(doc: &LoadDocument) -> Result<ValidatedConfig, ValidationError> {
    let mut v = Validator::new();
    let lowered = v.lower_document(doc);
    v.finish()?;
    // finish() only succeeds when every rule produced a value.
    lowered.ok_or_else(|| ValidationError::new(Vec::new()))
}
