use std::path::Path;

use serde::Serialize;

use jobload_core::GeneratorConfig;

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::OutputArgs;

use super::config::{build_registry, load_document};

#[derive(Serialize)]
struct GeneratorsResult<'a> {
    generators: Vec<&'a GeneratorConfig>,
}

pub async fn generators_cmd(path: &Path, output: OutputArgs) -> i32 {
    let document = match load_document(Some(path), &output) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let registry = match build_registry(&document, &output) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let result = GeneratorsResult {
        generators: registry.configured().collect(),
    };

    if output.format == OutputFormat::Text && !output.quiet {
        println!("Generators in {}:", path.display());
        for g in &result.generators {
            let state = if g.enabled { "enabled" } else { "disabled" };
            let mut line = format!(
                "  - {} ({state}) packageSize={} pause={}ms packagesCount={}",
                g.variant,
                g.package_size,
                g.pause.as_millis(),
                g.packages_count,
            );
            if let Some(n) = g.jobs_in_batch {
                line.push_str(&format!(" jobsInBatch={n}"));
            }
            if g.pipeline_depth > 1 {
                line.push_str(&format!(" pipelineDepth={}", g.pipeline_depth));
            }
            println!("{line}");
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    exit_codes::SUCCESS
}
