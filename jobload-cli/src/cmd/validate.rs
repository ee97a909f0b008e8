use std::path::Path;

use serde::Serialize;

use jobload_core::Variant;

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::OutputArgs;

use super::config::{build_registry, load_document};

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    target: String,
    enabled: Vec<Variant>,
}

pub async fn validate_cmd(path: &Path, output: OutputArgs) -> i32 {
    let document = match load_document(Some(path), &output) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let registry = match build_registry(&document, &output) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let result = ValidateResult {
        valid: true,
        target: registry.target().address.to_string(),
        enabled: registry.enabled_variants().into_iter().collect(),
    };

    if output.format == OutputFormat::Text && !output.quiet {
        println!("ok: valid load config (target {})", result.target);
        if result.enabled.is_empty() {
            println!("warning: no generator is enabled; `run` will refuse this config");
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }
    exit_codes::SUCCESS
}
