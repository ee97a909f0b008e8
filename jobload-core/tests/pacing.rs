use std::time::{Duration, Instant};

use jobload_core::{
    GeneratorConfig, GeneratorState, GeneratorStatus, PackagesCount, PacingPolicy, Variant,
};

fn config(pause: Duration, packages_count: PackagesCount) -> GeneratorConfig {
    GeneratorConfig {
        variant: Variant::SubmitDrop,
        enabled: true,
        package_size: 100,
        pause,
        packages_count,
        jobs_in_batch: None,
        pipeline_depth: 1,
        job_input: "jobload".to_string(),
    }
}

#[test]
fn first_package_is_eligible_immediately() {
    let policy = PacingPolicy::new(&config(Duration::from_secs(2), PackagesCount::Finite(3)));
    let state = GeneratorState::new(Variant::SubmitDrop);
    let now = Instant::now();
    assert!(policy.should_run_next(&state, now));
    assert_eq!(policy.next_delay(&state, now), Duration::ZERO);
    assert_eq!(policy.package_size(), 100);
}

#[test]
fn pause_boundary_is_inclusive() {
    let pause = Duration::from_secs(2);
    let policy = PacingPolicy::new(&config(pause, PackagesCount::Unlimited));
    let mut state = GeneratorState::new(Variant::SubmitDrop);
    let t0 = Instant::now();
    state.package_completed(t0);

    assert!(!policy.should_run_next(&state, t0));
    assert_eq!(policy.next_delay(&state, t0), pause);

    let just_before = t0 + pause - Duration::from_nanos(1);
    assert!(!policy.should_run_next(&state, just_before));
    assert_eq!(policy.next_delay(&state, just_before), Duration::from_nanos(1));

    assert!(policy.should_run_next(&state, t0 + pause));
    assert_eq!(policy.next_delay(&state, t0 + pause), Duration::ZERO);
    assert!(policy.should_run_next(&state, t0 + pause * 3));
}

#[test]
fn finite_count_stops_after_k_packages() {
    let policy = PacingPolicy::new(&config(Duration::ZERO, PackagesCount::Finite(3)));
    let mut state = GeneratorState::new(Variant::SubmitDrop);
    let now = Instant::now();

    let mut ran = 0;
    while policy.should_run_next(&state, now) {
        state.package_completed(now);
        ran += 1;
        assert!(ran <= 3, "ran more than packagesCount");
    }
    assert_eq!(ran, 3);
    assert!(!policy.has_remaining(&state));
}

#[test]
fn unlimited_count_always_has_remaining() {
    let policy = PacingPolicy::new(&config(Duration::ZERO, PackagesCount::Unlimited));
    let mut state = GeneratorState::new(Variant::SubmitDrop);
    let now = Instant::now();
    for _ in 0..10_000 {
        state.package_completed(now);
    }
    assert!(policy.has_remaining(&state));
    assert!(policy.should_run_next(&state, now));
}

#[test]
fn huge_pause_never_overflows() {
    let policy = PacingPolicy::new(&config(Duration::MAX, PackagesCount::Unlimited));
    let mut state = GeneratorState::new(Variant::SubmitDrop);
    let now = Instant::now();
    state.package_completed(now);
    assert!(!policy.should_run_next(&state, now));
    assert_eq!(policy.next_delay(&state, now), Duration::MAX);
}

#[test]
fn state_machine_allows_documented_transitions() {
    let mut state = GeneratorState::new(Variant::BatchSubmitDrop);
    assert_eq!(state.status(), GeneratorStatus::Idle);
    state.transition(GeneratorStatus::Running).unwrap();
    state.transition(GeneratorStatus::Paused).unwrap();
    state.transition(GeneratorStatus::Running).unwrap();
    state.transition(GeneratorStatus::Stopped).unwrap();
    assert!(state.status().is_terminal());
}

#[test]
fn state_machine_rejects_leaving_terminal_states() {
    let mut state = GeneratorState::new(Variant::SubmitDrop);
    state.transition(GeneratorStatus::Running).unwrap();
    state.transition(GeneratorStatus::Failed).unwrap();
    let err = state.transition(GeneratorStatus::Running).unwrap_err();
    assert_eq!(err.from, GeneratorStatus::Failed);
    assert_eq!(err.to, GeneratorStatus::Running);

    let mut idle = GeneratorState::new(Variant::SubmitDrop);
    assert!(idle.transition(GeneratorStatus::Paused).is_err());
    assert!(idle.transition(GeneratorStatus::Failed).is_err());
}
