use assert_cmd::Command;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    std::io::Write::write_all(&mut f, contents.as_bytes()).expect("write");
    f
}

fn jobload() -> Command {
    let mut cmd = Command::cargo_bin("jobload").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

const MEMORY_RUN: &str = r#"
target:
  address: memory://
generators:
  submitDrop:
    enabled: true
    packageSize: 5
    pause: 10ms
    packagesCount: 2
  batchSubmitDrop:
    enabled: false
    packageSize: 2
    jobsInBatch: 8
    packagesCount: unlimited
"#;

#[test]
fn validate_returns_0_for_valid_config() {
    let f = write_temp(MEMORY_RUN);
    jobload()
        .args(["validate", f.path().to_string_lossy().as_ref()])
        .assert()
        .success();
}

#[test]
fn validate_returns_2_and_lists_violations() {
    let doc = r#"
target:
  address: ns://localhost/no-port
generators:
  submitDrop:
    enabled: true
    packageSize: 0
    packagesCount: -2
"#;
    let f = write_temp(doc);
    let out = jobload()
        .args(["validate", f.path().to_string_lossy().as_ref()])
        .assert()
        .code(2)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(out).unwrap();
    assert!(stderr.contains("generators.submitDrop.packageSize"));
    assert!(stderr.contains("generators.submitDrop.packagesCount"));
    assert!(stderr.contains("target.address"));
}

#[test]
fn validate_rejects_unknown_variant() {
    let doc = r#"
target:
  address: memory://
generators:
  floodLoader:
    enabled: true
    packageSize: 1
    packagesCount: 1
"#;
    let f = write_temp(doc);
    jobload()
        .args(["validate", f.path().to_string_lossy().as_ref()])
        .assert()
        .code(2);
}

#[test]
fn validate_returns_4_for_missing_file() {
    jobload()
        .args(["validate", "/definitely/not/here.yaml"])
        .assert()
        .code(4);
}

#[test]
fn generators_lists_settings_as_json() {
    let f = write_temp(MEMORY_RUN);
    let out = jobload()
        .args([
            "generators",
            f.path().to_string_lossy().as_ref(),
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let generators = json["generators"].as_array().unwrap();
    assert_eq!(generators.len(), 2);
    assert_eq!(generators[0]["variant"], "submitDrop");
    assert_eq!(generators[0]["pauseMs"], 10);
    assert_eq!(generators[1]["variant"], "batchSubmitDrop");
    assert_eq!(generators[1]["packagesCount"], "unlimited");
    assert_eq!(generators[1]["jobsInBatch"], 8);
}

#[test]
fn run_against_memory_target_reports_totals() {
    let f = write_temp(MEMORY_RUN);
    let out = jobload()
        .args([
            "run",
            f.path().to_string_lossy().as_ref(),
            "--events",
            "none",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["cancelled"], false);
    assert_eq!(report["generators"]["submitDrop"]["status"], "stopped");
    assert_eq!(report["generators"]["submitDrop"]["packagesRun"], 2);
    assert_eq!(report["stats"]["perVariant"]["submitDrop"]["attempted"], 10);
    assert_eq!(report["stats"]["perVariant"]["submitDrop"]["succeeded"], 10);
    assert!(report["generators"].get("batchSubmitDrop").is_none());
}

#[test]
fn run_text_output_prints_summary_line() {
    let f = write_temp(MEMORY_RUN);
    let out = jobload()
        .args(["run", f.path().to_string_lossy().as_ref(), "--events", "none"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(out).unwrap();
    assert!(stdout.contains("submitDrop: packages=2 attempted=10 succeeded=10 failed=0"));
}

#[test]
fn run_from_environment_only() {
    let out = jobload()
        .args(["run", "--events", "none", "--format", "json"])
        .env("JOBLOAD_TARGET", "memory://")
        .env("JOBLOAD_SINGLE_FULL_OK_LOOP_ENABLED", "true")
        .env("JOBLOAD_SINGLE_FULL_OK_LOOP_PACKAGE_SIZE", "3")
        .env("JOBLOAD_SINGLE_FULL_OK_LOOP_PACKAGES_COUNT", "1")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["stats"]["perVariant"]["singleFullOkLoop"]["succeeded"], 3);
}

#[test]
fn run_without_enabled_generator_is_a_config_error() {
    let doc = r#"
target:
  address: memory://
generators:
  submitDrop:
    enabled: false
    packageSize: 1
    packagesCount: 1
"#;
    let f = write_temp(doc);
    jobload()
        .args(["run", f.path().to_string_lossy().as_ref()])
        .assert()
        .code(2);
}

#[test]
fn unreachable_target_fails_the_run() {
    let doc = r#"
target:
  address: ns://127.0.0.1:1/loadtest
  timeout: 2s
generators:
  submitDrop:
    enabled: true
    packageSize: 1
    packagesCount: 1
"#;
    let f = write_temp(doc);
    jobload()
        .args(["run", f.path().to_string_lossy().as_ref(), "--events", "none"])
        .assert()
        .code(3);

    jobload()
        .args([
            "run",
            f.path().to_string_lossy().as_ref(),
            "--events",
            "none",
            "--no-fail-on-generator-failure",
        ])
        .assert()
        .success();
}

#[test]
fn target_flag_overrides_config() {
    let doc = r#"
target:
  address: ns://127.0.0.1:1/loadtest
generators:
  submitDrop:
    enabled: true
    packageSize: 2
    packagesCount: 1
"#;
    let f = write_temp(doc);
    jobload()
        .args([
            "run",
            f.path().to_string_lossy().as_ref(),
            "--events",
            "none",
            "--target",
            "memory://",
        ])
        .assert()
        .success();
}
