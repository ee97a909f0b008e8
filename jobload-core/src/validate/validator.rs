use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{ValidationError, Violation};
use crate::types::{DurationValue, LoadDocument};

use super::{rules, ValidatedConfig};

pub(crate) static QUEUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("valid"));
pub(crate) static CLIENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\.\-]+$").expect("valid"));

pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }

    pub fn lower_document(&mut self, doc: &LoadDocument) -> Option<ValidatedConfig> {
        let target = rules::target::lower_target(self, doc.target.as_ref());
        let run = rules::run::lower_run(self, doc.run.as_ref());
        let generators = rules::generator::lower_generators(self, &doc.generators);
        Some(ValidatedConfig {
            target: target?,
            run: run?,
            generators: generators?,
        })
    }

    pub(crate) fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    pub(crate) fn positive(&mut self, path: &str, value: Option<i64>) -> Option<u64> {
        match value {
            Some(n) if n > 0 => Some(n as u64),
            Some(n) => {
                self.push(path, format!("must be a positive integer (got {n})"));
                None
            }
            None => {
                self.push(path, "is required");
                None
            }
        }
    }

    pub(crate) fn duration(&mut self, path: &str, value: &DurationValue) -> Option<Duration> {
        match value.resolve() {
            Ok(d) => Some(d),
            Err(e) => {
                self.push(path, e.to_string());
                None
            }
        }
    }
}
