use std::collections::BTreeSet;

use jobload_core::{parse_config_str, ConfigError, ConfigFormat, GeneratorRegistry, Variant};

fn registry(yaml: &str) -> GeneratorRegistry {
    let parsed = parse_config_str(yaml, ConfigFormat::Yaml).unwrap();
    GeneratorRegistry::from_document(&parsed.document).unwrap()
}

const TWO_CONFIGURED: &str = r#"
target:
  address: memory://
generators:
  submitDrop:
    enabled: true
    packageSize: 100
    pause: 2s
    packagesCount: 10
  batchSubmitDrop:
    enabled: false
    packageSize: 5
    jobsInBatch: 32
    packagesCount: unlimited
"#;

#[test]
fn enabled_variants_returns_only_enabled() {
    let reg = registry(TWO_CONFIGURED);
    assert_eq!(
        reg.enabled_variants(),
        BTreeSet::from([Variant::SubmitDrop])
    );
}

#[test]
fn config_for_returns_settings() {
    let reg = registry(TWO_CONFIGURED);
    let cfg = reg.config_for(Variant::BatchSubmitDrop).unwrap();
    assert_eq!(cfg.package_size, 5);
    assert_eq!(cfg.jobs_per_operation(), 32);
    assert!(!cfg.enabled);
}

#[test]
fn config_for_unconfigured_variant_fails() {
    let reg = registry(TWO_CONFIGURED);
    let err = reg.config_for(Variant::SingleFullOkLoop).unwrap_err();
    assert!(matches!(err, ConfigError::NotConfigured(Variant::SingleFullOkLoop)));
}

#[test]
fn config_for_name_accepts_every_spelling() {
    let reg = registry(TWO_CONFIGURED);
    for name in ["submitDrop", "submit_drop", "SubmitDropLoader"] {
        assert_eq!(reg.config_for_name(name).unwrap().variant, Variant::SubmitDrop);
    }
}

#[test]
fn config_for_name_unknown_fails() {
    let reg = registry(TWO_CONFIGURED);
    let err = reg.config_for_name("FloodLoader").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownVariant(name) if name == "FloodLoader"));
}

#[test]
fn ensure_runnable_requires_an_enabled_generator() {
    let reg = registry(
        r#"
target:
  address: memory://
generators:
  submitDrop:
    packageSize: 1
    packagesCount: 1
"#,
    );
    assert!(matches!(reg.ensure_runnable(), Err(ConfigError::NoneEnabled)));
    assert!(registry(TWO_CONFIGURED).ensure_runnable().is_ok());
}

#[test]
fn invalid_document_is_config_error() {
    let parsed = parse_config_str(
        r#"
target:
  address: memory://
generators:
  submitDrop:
    packageSize: -3
    packagesCount: 1
"#,
        ConfigFormat::Yaml,
    )
    .unwrap();
    let err = GeneratorRegistry::from_document(&parsed.document).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn run_options_default_when_absent() {
    let reg = registry(TWO_CONFIGURED);
    let run = reg.run_options();
    assert_eq!(run.report_interval, None);
    assert!(run.fail_on_generator_failure);
    assert_eq!(run.max_consecutive_transport_errors, 5);
    assert_eq!(reg.target().client_name, "jobload");
}
