use swiftlet_cli::{run, RunOptions, Variant};
use swiftlet_core::Vec2;

#[test]
fn flock_run_keeps_speeds_within_spawn_bounds() {
    let options = RunOptions {
        variant: Variant::Flock,
        duration: 2.0,
        count: 24,
        sweep_pointer: true,
        ..RunOptions::default()
    };
    let summary = run(&options).expect("flock run");

    assert_eq!(summary.variant, "flock");
    assert!(summary.ticks >= 118, "expected ~120 ticks, got {}", summary.ticks);
    // Spawn jitter tops out at 1.2x the base speed.
    let max_spawn_speed = swiftlet_core::FlockConfig::default().base_speed * 1.2;
    assert!(summary.mean_speed <= max_spawn_speed + 0.001);
    assert!(summary.dwell_seconds.is_empty());
    assert!(summary.final_state.is_none());
}

#[test]
fn bird_run_reaches_a_perch_cycle() {
    // Long enough to cover the 4s first search plus an approach and dwell.
    let options = RunOptions {
        variant: Variant::Bird,
        duration: 30.0,
        perches: vec![Vec2::new(420.0, 180.0)],
        ..RunOptions::default()
    };
    let summary = run(&options).expect("bird run");

    assert_eq!(summary.variant, "bird");
    assert!(summary.transitions >= 2, "bird never left flying");
    let dwell_total: f32 = summary.dwell_seconds.values().sum();
    assert!((dwell_total - summary.sim_seconds).abs() < 0.01);
    assert!(summary.dwell_seconds.contains_key("flying"));
    assert!(
        summary.dwell_seconds.contains_key("perched"),
        "expected a landing within 30s, saw {:?}",
        summary.dwell_seconds
    );
}

#[test]
fn bird_run_without_perches_stays_airborne() {
    let options = RunOptions {
        variant: Variant::Bird,
        duration: 12.0,
        perches: Vec::new(),
        ..RunOptions::default()
    };
    let summary = run(&options).expect("bird run");

    assert!(!summary.dwell_seconds.contains_key("perched"));
    assert!(!summary.dwell_seconds.contains_key("approaching"));
    // Searching bounces straight back to flying when nothing is available.
    assert!(summary.dwell_seconds.contains_key("flying"));
}

#[test]
fn invalid_profile_is_rejected() {
    let mut settings = swiftlet_config::BirdSettings::default();
    settings.sequences.remove("fleeing");
    let options = RunOptions {
        variant: Variant::Bird,
        duration: 1.0,
        bird_settings: Some(settings),
        ..RunOptions::default()
    };
    assert!(run(&options).is_err());
}
