//! `JOBLOAD_*` environment overrides, applied to a parsed document before validation.

use crate::error::{ValidationError, Violation};
use crate::types::{
    parse_duration, CountValue, DurationValue, GeneratorSection, LoadDocument, RunSection,
    TargetSection, Variant,
};

pub const TARGET_KEY: &str = "JOBLOAD_TARGET";
pub const REPORT_INTERVAL_KEY: &str = "JOBLOAD_REPORT_INTERVAL";

const FIELDS: [&str; 6] = [
    "ENABLED",
    "PACKAGE_SIZE",
    "PAUSE",
    "PACKAGES_COUNT",
    "JOBS_IN_BATCH",
    "PIPELINE_DEPTH",
];

/// Reads the real process environment.
pub fn process_env() -> impl Fn(&str) -> Option<String> {
    |key: &str| std::env::var(key).ok()
}

/// Apply every override `lookup` knows about to `doc`.
///
/// An override for a generator without a section creates one under its canonical name.
/// Values that do not parse are reported at `env.<KEY>`; the document is left untouched
/// for those keys.
pub fn apply_env_overrides(
    doc: &mut LoadDocument,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if let Some(address) = lookup(TARGET_KEY) {
        doc.target
            .get_or_insert_with(TargetSection::default)
            .address = Some(address.trim().to_string());
    }

    if let Some(raw) = lookup(REPORT_INTERVAL_KEY) {
        match parse_duration(&raw) {
            Ok(_) => {
                doc.run.get_or_insert_with(RunSection::default).report_interval =
                    Some(DurationValue::Text(raw.trim().to_string()));
            }
            Err(e) => violations.push(env_violation(REPORT_INTERVAL_KEY, e.to_string())),
        }
    }

    for variant in Variant::ALL {
        for field in FIELDS {
            let key = format!("JOBLOAD_{}_{}", variant.env_segment(), field);
            let Some(raw) = lookup(&key) else {
                continue;
            };
            let raw = raw.trim();
            let section = section_for(doc, variant);
            if let Err(msg) = apply_field(section, field, raw) {
                violations.push(env_violation(&key, msg));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(violations))
    }
}

fn section_for(doc: &mut LoadDocument, variant: Variant) -> &mut GeneratorSection {
    let existing = doc
        .generators
        .keys()
        .find(|k| k.parse::<Variant>().ok() == Some(variant))
        .cloned();
    let key = existing.unwrap_or_else(|| variant.as_str().to_string());
    doc.generators.entry(key).or_default()
}

fn apply_field(section: &mut GeneratorSection, field: &str, raw: &str) -> Result<(), String> {
    match field {
        "ENABLED" => section.enabled = parse_bool(raw)?,
        "PACKAGE_SIZE" => section.package_size = Some(parse_int(raw)?),
        "PAUSE" => {
            parse_duration(raw).map_err(|e| e.to_string())?;
            section.pause = Some(DurationValue::Text(raw.to_string()));
        }
        "PACKAGES_COUNT" => {
            let value = CountValue::Text(raw.to_string());
            value.resolve()?;
            section.packages_count = Some(value);
        }
        "JOBS_IN_BATCH" => section.jobs_in_batch = Some(parse_int(raw)?),
        "PIPELINE_DEPTH" => section.pipeline_depth = Some(parse_int(raw)?),
        other => return Err(format!("unsupported field {other}")),
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("expected a boolean (got {raw:?})")),
    }
}

fn parse_int(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("expected an integer (got {raw:?})"))
}

fn env_violation(key: &str, message: impl Into<String>) -> Violation {
    Violation::new(format!("env.{key}"), message)
}
