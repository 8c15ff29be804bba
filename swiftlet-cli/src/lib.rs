//! Headless runner for the swiftlet simulations.
//!
//! Drives either animation variant at a fixed timestep with a scripted
//! pointer and perch list, for tuning behavior parameters and catching
//! regressions without a browser in the loop.

use std::collections::BTreeMap;

use anyhow::{ensure, Context, Result};
use serde::Serialize;
use swiftlet_config::BirdSettings;
use swiftlet_core::{Bird, FlockStd, SlicePerchSource, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Flock,
    Bird,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Flock => "flock",
            Variant::Bird => "bird",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub variant: Variant,
    /// Simulated duration in seconds.
    pub duration: f32,
    /// Fixed timestep in seconds.
    pub step: f32,
    pub width: f32,
    pub height: f32,
    /// Flock agent count; ignored by the bird variant.
    pub count: usize,
    /// Sweep the pointer horizontally across the scene during the run.
    pub sweep_pointer: bool,
    /// Scripted perch candidates for the bird variant.
    pub perches: Vec<Vec2>,
    /// Bird profile; defaults when absent.
    pub bird_settings: Option<BirdSettings>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            variant: Variant::Flock,
            duration: 10.0,
            step: 1.0 / 60.0,
            width: 800.0,
            height: 600.0,
            count: 48,
            sweep_pointer: false,
            perches: vec![
                Vec2::new(200.0, 150.0),
                Vec2::new(450.0, 90.0),
                Vec2::new(650.0, 220.0),
            ],
            bird_settings: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub variant: &'static str,
    pub ticks: u64,
    pub sim_seconds: f32,
    pub mean_speed: f32,
    /// Bird only: number of state transitions observed.
    pub transitions: u64,
    /// Bird only: simulated seconds spent in each state.
    pub dwell_seconds: BTreeMap<&'static str, f32>,
    pub final_state: Option<&'static str>,
}

pub fn run(options: &RunOptions) -> Result<RunSummary> {
    ensure!(options.duration > 0.0, "duration must be positive");
    ensure!(options.step > 0.0, "step must be positive");

    match options.variant {
        Variant::Flock => run_flock(options),
        Variant::Bird => run_bird(options),
    }
}

fn scripted_pointer(options: &RunOptions, elapsed: f32) -> Option<Vec2> {
    if !options.sweep_pointer {
        return None;
    }
    // One full left-to-right sweep over the run, at mid-height.
    let progress = (elapsed / options.duration).min(1.0);
    Some(Vec2::new(options.width * progress, options.height * 0.5))
}

fn run_flock(options: &RunOptions) -> Result<RunSummary> {
    ensure!(options.count > 0, "flock needs at least one agent");

    let settings = swiftlet_config::FlockSettings::default();
    let mut flock = FlockStd::new(
        options.width,
        options.height,
        options.count,
        settings.to_config(),
    );
    log::info!(
        "flock run: {} agents, {}s at {}ms steps",
        options.count,
        options.duration,
        options.step * 1000.0
    );

    let mut ticks = 0u64;
    let mut speed_sum = 0.0f64;
    let mut elapsed = 0.0f32;

    while elapsed < options.duration {
        let pointer = scripted_pointer(options, elapsed);
        flock.update(options.step, pointer);
        for agent in &flock.agents {
            speed_sum += agent.velocity.magnitude() as f64;
        }
        ticks += 1;
        elapsed += options.step;
    }

    let samples = ticks * options.count as u64;
    Ok(RunSummary {
        variant: Variant::Flock.name(),
        ticks,
        sim_seconds: elapsed,
        mean_speed: if samples > 0 {
            (speed_sum / samples as f64) as f32
        } else {
            0.0
        },
        transitions: 0,
        dwell_seconds: BTreeMap::new(),
        final_state: None,
    })
}

fn run_bird(options: &RunOptions) -> Result<RunSummary> {
    let settings = options.bird_settings.clone().unwrap_or_default();
    settings.validate().context("invalid bird profile")?;
    let table = settings.sequence_table().context("invalid bird profile")?;
    let config = settings.to_config();

    let mut bird = Bird::new(
        Vec2::new(options.width * 0.5, options.height * 0.3),
        &config,
    );
    let source = SlicePerchSource(&options.perches);
    log::info!(
        "bird run: {} perches, {}s at {}ms steps",
        options.perches.len(),
        options.duration,
        options.step * 1000.0
    );

    let mut ticks = 0u64;
    let mut speed_sum = 0.0f64;
    let mut transitions = 0u64;
    let mut dwell: BTreeMap<&'static str, f32> = BTreeMap::new();
    let mut elapsed = 0.0f32;

    while elapsed < options.duration {
        let pointer = scripted_pointer(options, elapsed);
        let before = bird.state;
        bird.update(options.step, pointer, &source, &config);
        bird.animate(options.step, &table);

        if bird.state != before {
            transitions += 1;
            log::debug!(
                "t={:.2}s {} -> {}",
                elapsed,
                before.name(),
                bird.state.name()
            );
        }
        *dwell.entry(bird.state.name()).or_insert(0.0) += options.step;
        speed_sum += bird.velocity.magnitude() as f64;
        ticks += 1;
        elapsed += options.step;
    }

    Ok(RunSummary {
        variant: Variant::Bird.name(),
        ticks,
        sim_seconds: elapsed,
        mean_speed: if ticks > 0 {
            (speed_sum / ticks as f64) as f32
        } else {
            0.0
        },
        transitions,
        dwell_seconds: dwell,
        final_state: Some(bird.state.name()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_duration() {
        let options = RunOptions {
            duration: 0.0,
            ..RunOptions::default()
        };
        assert!(run(&options).is_err());
    }

    #[test]
    fn test_rejects_empty_flock() {
        let options = RunOptions {
            count: 0,
            ..RunOptions::default()
        };
        assert!(run(&options).is_err());
    }

    #[test]
    fn test_pointer_sweep_crosses_scene() {
        let options = RunOptions {
            sweep_pointer: true,
            ..RunOptions::default()
        };
        let start = scripted_pointer(&options, 0.0).expect("pointer");
        let end = scripted_pointer(&options, options.duration).expect("pointer");
        assert_eq!(start.x, 0.0);
        assert_eq!(end.x, options.width);
    }
}
