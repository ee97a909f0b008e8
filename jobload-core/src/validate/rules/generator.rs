use std::collections::BTreeMap;
use std::time::Duration;

use crate::registry::{
    GeneratorConfig, DEFAULT_JOB_INPUT, DEFAULT_PIPELINE_DEPTH, MAX_JOBS_IN_BATCH,
};
use crate::types::{GeneratorSection, Variant};
use crate::validate::validator::Validator;

pub(crate) fn lower_generators(
    v: &mut Validator,
    sections: &BTreeMap<String, GeneratorSection>,
) -> Option<BTreeMap<Variant, GeneratorConfig>> {
    let mut out = BTreeMap::new();
    let mut seen: BTreeMap<Variant, &str> = BTreeMap::new();
    let mut ok = true;

    for (key, section) in sections {
        let path = format!("generators.{key}");
        let variant: Variant = match key.parse() {
            Ok(variant) => variant,
            Err(e) => {
                v.push(&path, e.to_string());
                ok = false;
                continue;
            }
        };
        if let Some(first) = seen.insert(variant, key) {
            v.push(
                &path,
                format!("duplicate section for {variant} (also configured as {first:?})"),
            );
            ok = false;
            continue;
        }
        match lower_generator(v, &path, variant, section) {
            Some(config) => {
                out.insert(variant, config);
            }
            None => ok = false,
        }
    }

    ok.then_some(out)
}

pub(crate) fn lower_generator(
    v: &mut Validator,
    path: &str,
    variant: Variant,
    section: &GeneratorSection,
) -> Option<GeneratorConfig> {
    let package_size = v.positive(&format!("{path}.packageSize"), section.package_size);

    let packages_count = match &section.packages_count {
        Some(raw) => match raw.resolve() {
            Ok(count) => Some(count),
            Err(msg) => {
                v.push(format!("{path}.packagesCount"), msg);
                None
            }
        },
        None => {
            v.push(format!("{path}.packagesCount"), "is required");
            None
        }
    };

    let pause = match &section.pause {
        Some(value) => v.duration(&format!("{path}.pause"), value),
        None => Some(Duration::ZERO),
    };

    let jobs_in_batch = if variant.is_batched() {
        match v.positive(&format!("{path}.jobsInBatch"), section.jobs_in_batch) {
            Some(n) if n > MAX_JOBS_IN_BATCH => {
                v.push(
                    format!("{path}.jobsInBatch"),
                    format!("must be at most {MAX_JOBS_IN_BATCH} (got {n})"),
                );
                None
            }
            n => n.map(Some),
        }
    } else if section.jobs_in_batch.is_some() {
        v.push(
            format!("{path}.jobsInBatch"),
            format!("is only valid for {}", Variant::BatchSubmitDrop),
        );
        None
    } else {
        Some(None)
    };

    let pipeline_depth = match section.pipeline_depth {
        Some(_) => v
            .positive(&format!("{path}.pipelineDepth"), section.pipeline_depth)
            .map(|n| n as usize),
        None => Some(DEFAULT_PIPELINE_DEPTH),
    };

    let job_input = match section.job_input.as_deref() {
        Some(input) if input.contains(['\n', '\r']) => {
            v.push(format!("{path}.jobInput"), "must be a single line");
            None
        }
        Some(input) => Some(input.to_string()),
        None => Some(DEFAULT_JOB_INPUT.to_string()),
    };

    Some(GeneratorConfig {
        variant,
        enabled: section.enabled,
        package_size: package_size?,
        pause: pause?,
        packages_count: packages_count?,
        jobs_in_batch: jobs_in_batch?,
        pipeline_depth: pipeline_depth?,
        job_input: job_input?,
    })
}
