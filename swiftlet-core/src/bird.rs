//! The perching bird: a single-agent state machine that flies, looks for a
//! landing spot, settles, and flees from the pointer.
//!
//! Transition logic runs in a fixed order each tick: the flee interrupt is
//! evaluated before the per-state behavior, so the pointer preempts an
//! in-flight approach or search without any unwinding. At most one
//! transition happens per tick, and every transition resets the sprite
//! frame and timer.

#[cfg(feature = "std")]
use crate::perch::PerchSource;
use crate::sprite::{advance_frame, SequenceTable};
#[cfg(feature = "std")]
use crate::vec2::{lerp, lerp_angle};
use crate::vec2::Vec2;

#[cfg(feature = "std")]
use rand::Rng;

/// Simulation state of the bird. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BirdState {
    Flying,
    Searching,
    Approaching,
    Perched,
    Fleeing,
}

impl BirdState {
    pub fn name(&self) -> &'static str {
        match self {
            BirdState::Flying => "flying",
            BirdState::Searching => "searching",
            BirdState::Approaching => "approaching",
            BirdState::Perched => "perched",
            BirdState::Fleeing => "fleeing",
        }
    }
}

/// Tuning for the bird. Distances in canvas units, times in seconds,
/// angles in radians.
#[derive(Debug, Clone, Copy)]
pub struct BirdConfig {
    pub base_speed: f32,
    /// Render size; the web driver also uses it to filter perch candidates.
    pub size: f32,
    /// Pointer distance that triggers the flee interrupt.
    pub repel_distance: f32,
    /// Distance to the target below which the bird snaps onto the perch.
    pub land_distance: f32,
    /// Approach speed scales down linearly inside this radius.
    pub slow_radius: f32,
    pub approach_speed_factor: f32,
    pub flee_speed_factor: f32,
    pub flee_duration: f32,
    /// Delay before the first search; later searches wait a random time in
    /// `[search_delay_min, search_delay_max]`.
    pub first_search_delay: f32,
    pub search_delay_min: f32,
    pub search_delay_max: f32,
    pub dwell_min: f32,
    pub dwell_max: f32,
    pub max_tilt: f32,
    /// Smoothing rate for the cosmetic facing/tilt interpolation.
    pub turn_rate: f32,
    pub max_delta: f32,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            base_speed: 80.0,
            size: 28.0,
            repel_distance: 120.0,
            land_distance: 10.0,
            slow_radius: 80.0,
            approach_speed_factor: 1.5,
            flee_speed_factor: 2.0,
            flee_duration: 2.0,
            first_search_delay: 4.0,
            search_delay_min: 5.0,
            search_delay_max: 10.0,
            dwell_min: 3.0,
            dwell_max: 7.0,
            max_tilt: 0.35,
            turn_rate: 6.0,
            max_delta: 0.032,
        }
    }
}

/// The bird itself. Business state (`state`, `target`, `state_timer`) and
/// presentation state (`frame`, `frame_timer`, `angle`, `facing`) are kept
/// separate: the former evolves by simulation rules, the latter by
/// wall-clock animation timing keyed off the former.
#[derive(Debug, Clone)]
pub struct Bird {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Cosmetic tilt, smoothed toward the velocity pitch. Never read by
    /// transition logic.
    pub angle: f32,
    /// Cosmetic facing, smoothed toward ±1 from the horizontal velocity
    /// sign. Never read by transition logic.
    pub facing: f32,
    pub state: BirdState,
    /// Countdown driving the current state's timed transition.
    pub state_timer: f32,
    /// Chosen landing point while approaching or perched. A flee out of
    /// Approaching leaves it set; Searching recomputes it fresh, so the
    /// stale value is inert.
    pub target: Option<Vec2>,
    pub frame: u32,
    pub frame_timer: f32,
}

impl Bird {
    #[cfg(feature = "std")]
    pub fn new(position: Vec2, config: &BirdConfig) -> Self {
        let mut rng = rand::thread_rng();
        let angle = rng.gen_range(0.0..core::f32::consts::TAU);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * (config.base_speed * 0.6);
        Self {
            position,
            velocity,
            angle: 0.0,
            facing: 1.0,
            state: BirdState::Flying,
            state_timer: config.first_search_delay,
            target: None,
            frame: 0,
            frame_timer: 0.0,
        }
    }

    /// True when the pointer is close enough to trigger the flee interrupt.
    pub fn pointer_threatens(&self, pointer: Option<Vec2>, config: &BirdConfig) -> bool {
        match pointer {
            Some(p) => {
                self.position.distance_squared(&p) < config.repel_distance * config.repel_distance
            }
            None => false,
        }
    }

    /// Runs one simulation tick: flee interrupt first, then the current
    /// state's behavior, then integration and the cosmetic smoothing.
    #[cfg(feature = "std")]
    pub fn update<P>(&mut self, dt: f32, pointer: Option<Vec2>, perches: &P, config: &BirdConfig)
    where
        P: PerchSource + ?Sized,
    {
        let dt = dt.min(config.max_delta);
        let mut rng = rand::thread_rng();
        let prev_state = self.state;

        // Interrupt before the per-state switch so a flee preempts an
        // approach or search mid-flight. The target is left as-is.
        if self.state != BirdState::Fleeing && self.pointer_threatens(pointer, config) {
            self.state = BirdState::Fleeing;
            self.state_timer = config.flee_duration;
        }

        match self.state {
            BirdState::Flying => {
                let jitter = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                self.velocity += jitter * (config.base_speed * 2.0 * dt);
                self.velocity = self.velocity.limit(config.base_speed);

                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    self.state = BirdState::Searching;
                }
            }
            BirdState::Searching => match perches.nearest(self.position) {
                Some(perch) => {
                    self.target = Some(perch);
                    self.state = BirdState::Approaching;
                }
                None => {
                    // No candidates is not an error; keep flying.
                    self.state = BirdState::Flying;
                    self.state_timer =
                        rng.gen_range(config.search_delay_min..config.search_delay_max);
                }
            },
            BirdState::Approaching => {
                if let Some(target) = self.target {
                    let to_target = target - self.position;
                    let dist = to_target.magnitude();
                    if dist < config.land_distance {
                        self.position = target;
                        self.velocity = Vec2::zero();
                        self.state = BirdState::Perched;
                        self.state_timer = rng.gen_range(config.dwell_min..config.dwell_max);
                    } else {
                        let top_speed = config.base_speed * config.approach_speed_factor;
                        let speed = top_speed * (dist / config.slow_radius).clamp(0.2, 1.0);
                        let desired = (to_target / dist) * speed;
                        self.velocity = self.velocity.lerp(&desired, (dt * 5.0).min(1.0));
                    }
                } else {
                    // Approaching without a target cannot happen through the
                    // public surface; recover by searching again.
                    self.state = BirdState::Searching;
                }
            }
            BirdState::Perched => {
                self.velocity = Vec2::zero();
                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    self.state = BirdState::Flying;
                    self.state_timer =
                        rng.gen_range(config.search_delay_min..config.search_delay_max);
                    // Take off upward.
                    self.velocity = Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-1.0..-0.4))
                        * config.base_speed;
                    self.target = None;
                }
            }
            BirdState::Fleeing => {
                if let Some(p) = pointer {
                    let away = self.position - p;
                    if away.magnitude_squared() > 0.0 {
                        let desired =
                            away.normalize() * (config.base_speed * config.flee_speed_factor);
                        self.velocity = self.velocity.lerp(&desired, (dt * 6.0).min(1.0));
                    }
                }
                self.velocity = self
                    .velocity
                    .limit(config.base_speed * config.flee_speed_factor);

                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    // Always back to flying, never straight to a perch.
                    self.state = BirdState::Flying;
                    self.state_timer =
                        rng.gen_range(config.search_delay_min..config.search_delay_max);
                }
            }
        }

        self.position += self.velocity * dt;

        if self.state != prev_state {
            self.frame = 0;
            self.frame_timer = 0.0;
        }

        self.smooth_pose(dt, config);
    }

    /// Advances the sprite frame for the active sequence. Independent of the
    /// simulation step so presentation timing never leaks into transitions.
    pub fn animate(&mut self, dt: f32, table: &SequenceTable) {
        let sequence = table.for_state(self.state);
        let (frame, timer) = advance_frame(self.frame, self.frame_timer, dt, sequence);
        self.frame = frame;
        self.frame_timer = timer;
    }

    #[cfg(feature = "std")]
    fn smooth_pose(&mut self, dt: f32, config: &BirdConfig) {
        const FACING_DEADBAND: f32 = 4.0;

        let facing_target = if self.velocity.x > FACING_DEADBAND {
            1.0
        } else if self.velocity.x < -FACING_DEADBAND {
            -1.0
        } else if self.facing >= 0.0 {
            1.0
        } else {
            -1.0
        };
        self.facing = lerp(self.facing, facing_target, (dt * config.turn_rate).min(1.0));

        let tilt_target = if self.state == BirdState::Perched {
            0.0
        } else {
            (self.velocity.y / config.base_speed).clamp(-1.0, 1.0) * config.max_tilt
        };
        self.angle = lerp_angle(self.angle, tilt_target, (dt * config.turn_rate).min(1.0));
    }
}
