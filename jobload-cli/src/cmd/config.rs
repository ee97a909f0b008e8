use std::path::Path;

use jobload_core::{
    apply_env_overrides, parse_config_str, process_env, ConfigError, ConfigFormat, DurationValue,
    GeneratorRegistry, LoadDocument, RunSection, TargetSection,
};

use crate::exit_codes;
use crate::output::{print_error, print_violations};
use crate::{OutputArgs, OverrideArgs};

/// Read and parse `path`, then apply `JOBLOAD_*` overrides. Without a path the document starts
/// empty. On failure the error is printed and the exit code returned.
pub fn load_document(path: Option<&Path>, output: &OutputArgs) -> Result<LoadDocument, i32> {
    let mut document = match path {
        Some(path) => {
            let content = match std::fs::read_to_string(path) {
                Ok(v) => v,
                Err(e) => {
                    print_error(
                        output.format,
                        output.quiet,
                        &format!("failed to read {}: {e}", path.display()),
                    );
                    return Err(exit_codes::RUNTIME_ERROR);
                }
            };
            match parse_config_str(&content, ConfigFormat::Auto) {
                Ok(parsed) => parsed.document,
                Err(e) => {
                    report_config_error(output, &ConfigError::Parse(e));
                    return Err(exit_codes::VALIDATION_FAILED);
                }
            }
        }
        None => LoadDocument::default(),
    };

    if let Err(e) = apply_env_overrides(&mut document, process_env()) {
        report_config_error(output, &ConfigError::Validation(e));
        return Err(exit_codes::VALIDATION_FAILED);
    }
    Ok(document)
}

/// Fold command-line flags into the document so they go through the same validation.
pub fn apply_cli_overrides(document: &mut LoadDocument, overrides: &OverrideArgs) {
    if let Some(target) = &overrides.target {
        document
            .target
            .get_or_insert_with(TargetSection::default)
            .address = Some(target.clone());
    }
    if let Some(interval) = &overrides.report_interval {
        document
            .run
            .get_or_insert_with(RunSection::default)
            .report_interval = Some(DurationValue::Text(interval.clone()));
    }
    if overrides.no_fail_on_generator_failure {
        document
            .run
            .get_or_insert_with(RunSection::default)
            .fail_on_generator_failure = Some(false);
    }
}

pub fn build_registry(
    document: &LoadDocument,
    output: &OutputArgs,
) -> Result<GeneratorRegistry, i32> {
    GeneratorRegistry::from_document(document).map_err(|e| {
        report_config_error(output, &e);
        exit_codes::VALIDATION_FAILED
    })
}

pub fn report_config_error(output: &OutputArgs, err: &ConfigError) {
    match err {
        ConfigError::Validation(v) => {
            let violations: Vec<String> = v.violations.iter().map(|v| v.to_string()).collect();
            print_violations(
                output.format,
                output.quiet,
                "config validation failed",
                &violations,
            );
        }
        other => print_error(output.format, output.quiet, &other.to_string()),
    }
}
