//! Boids-style flocking model with pointer repulsion and click scatter.
//!
//! Forces are recomputed from scratch every tick and integrated with the
//! elapsed time, which the update entry points cap so a tab-resume delta
//! cannot launch agents across the canvas.

use crate::vec2::Vec2;

#[cfg(feature = "std")]
use rand::Rng;

/// A single flocking agent.
///
/// `max_speed` and `size` are fixed at spawn (randomized around the
/// configured base values); `acceleration` is rebuilt each tick from the
/// behavior forces and zeroed after integration.
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_speed: f32,
    pub size: f32,
}

impl Agent {
    pub fn new(position: Vec2, velocity: Vec2, max_speed: f32, size: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::zero(),
            max_speed,
            size,
        }
    }

    /// Spawns an agent at a random position with per-agent parameter jitter:
    /// max speed ±20% and size ±10% around the configured base values.
    #[cfg(feature = "std")]
    pub fn spawn(width: f32, height: f32, config: &FlockConfig) -> Self {
        let mut rng = rand::thread_rng();
        let position = Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        let angle = rng.gen_range(0.0..core::f32::consts::TAU);
        let max_speed = config.base_speed * rng.gen_range(0.8..1.2);
        let size = config.base_size * rng.gen_range(0.9..1.1);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * (max_speed * 0.5);
        Self::new(position, velocity, max_speed, size)
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Integrates acceleration into velocity (clamped to this agent's max
    /// speed) and velocity into position, then clears the acceleration.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.velocity = self.velocity.limit(self.max_speed);
        self.position += self.velocity * dt;
        self.acceleration = Vec2::zero();
    }

    /// Toroidal wrap: leaving one edge re-enters the opposite edge just
    /// outside the visible area so agents glide in rather than pop.
    pub fn wrap_edges(&mut self, width: f32, height: f32, margin: f32) {
        if self.position.x < -margin {
            self.position.x = width + margin;
        } else if self.position.x > width + margin {
            self.position.x = -margin;
        }

        if self.position.y < -margin {
            self.position.y = height + margin;
        } else if self.position.y > height + margin {
            self.position.y = -margin;
        }
    }
}

/// Tuning for the flocking simulation. Distances and speeds are in canvas
/// units (CSS pixels on the web target); times are in seconds.
#[derive(Debug, Clone, Copy)]
pub struct FlockConfig {
    pub base_speed: f32,
    pub base_size: f32,
    pub max_force: f32,
    pub neighbor_radius: f32,
    pub separation_radius: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub edge_margin: f32,
    pub edge_push: f32,
    pub mouse_radius: f32,
    pub mouse_push: f32,
    pub scatter_duration: f32,
    pub scatter_strength: f32,
    pub wrap_margin: f32,
    /// Upper bound on the per-tick delta, guards against tab-resume spikes.
    pub max_delta: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            base_speed: 120.0,
            base_size: 8.0,
            max_force: 300.0,
            neighbor_radius: 70.0,
            separation_radius: 28.0,
            alignment_weight: 1.0,
            cohesion_weight: 0.8,
            separation_weight: 1.6,
            edge_margin: 80.0,
            edge_push: 250.0,
            mouse_radius: 150.0,
            mouse_push: 600.0,
            scatter_duration: 0.8,
            scatter_strength: 400.0,
            wrap_margin: 12.0,
            max_delta: 0.032,
        }
    }
}

/// Steering behaviors as free functions over an iterator of neighbors.
pub mod behavior {
    use super::*;

    fn steer_toward(agent: &Agent, desired: Vec2, config: &FlockConfig) -> Vec2 {
        (desired - agent.velocity).limit(config.max_force)
    }

    /// Match the average velocity of neighbors within the neighbor radius.
    pub fn alignment<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vec2
    where
        I: Iterator<Item = &'a Agent>,
    {
        let radius_sq = config.neighbor_radius * config.neighbor_radius;
        let mut sum = Vec2::zero();
        let mut count = 0;

        for other in others {
            let dist_sq = agent.position.distance_squared(&other.position);
            if dist_sq > 0.0 && dist_sq < radius_sq {
                sum += other.velocity;
                count += 1;
            }
        }

        if count > 0 {
            let desired = (sum / count as f32).limit(agent.max_speed);
            steer_toward(agent, desired, config)
        } else {
            Vec2::zero()
        }
    }

    /// Steer toward the centroid of neighbors within the neighbor radius.
    pub fn cohesion<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vec2
    where
        I: Iterator<Item = &'a Agent>,
    {
        let radius_sq = config.neighbor_radius * config.neighbor_radius;
        let mut sum = Vec2::zero();
        let mut count = 0;

        for other in others {
            let dist_sq = agent.position.distance_squared(&other.position);
            if dist_sq > 0.0 && dist_sq < radius_sq {
                sum += other.position;
                count += 1;
            }
        }

        if count > 0 {
            let centroid = sum / count as f32;
            let desired = (centroid - agent.position).normalize() * agent.max_speed;
            steer_toward(agent, desired, config)
        } else {
            Vec2::zero()
        }
    }

    /// Push away from neighbors closer than the separation radius.
    pub fn separation<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vec2
    where
        I: Iterator<Item = &'a Agent>,
    {
        let radius_sq = config.separation_radius * config.separation_radius;
        let mut away = Vec2::zero();
        let mut count = 0;

        for other in others {
            let dist_sq = agent.position.distance_squared(&other.position);
            if dist_sq > 0.0 && dist_sq < radius_sq {
                away += agent.position - other.position;
                count += 1;
            }
        }

        if count > 0 && away.magnitude_squared() > 0.0 {
            let desired = away.normalize() * agent.max_speed;
            steer_toward(agent, desired, config)
        } else {
            Vec2::zero()
        }
    }

    /// Constant inward push when the agent is within the edge margin.
    pub fn boundary(agent: &Agent, width: f32, height: f32, config: &FlockConfig) -> Vec2 {
        let mut force = Vec2::zero();

        if agent.position.x < config.edge_margin {
            force.x += config.edge_push;
        } else if agent.position.x > width - config.edge_margin {
            force.x -= config.edge_push;
        }

        if agent.position.y < config.edge_margin {
            force.y += config.edge_push;
        } else if agent.position.y > height - config.edge_margin {
            force.y -= config.edge_push;
        }

        force
    }

    /// Repulsion from the pointer, strongest at zero distance and fading
    /// linearly to nothing at the mouse radius.
    pub fn pointer_repulsion(agent: &Agent, pointer: Vec2, config: &FlockConfig) -> Vec2 {
        let radius_sq = config.mouse_radius * config.mouse_radius;
        let dist_sq = agent.position.distance_squared(&pointer);
        if dist_sq >= radius_sq {
            return Vec2::zero();
        }

        let diff = agent.position - pointer;
        let dist = diff.magnitude();
        // Direction is undefined at exactly zero distance; push straight up.
        let dir = if dist > 0.0 {
            diff / dist
        } else {
            Vec2::new(0.0, -1.0)
        };
        dir * (config.mouse_push * (1.0 - dist / config.mouse_radius))
    }

    /// Bounded random jitter applied during the post-click scatter window.
    #[cfg(feature = "std")]
    pub fn scatter_jitter(config: &FlockConfig) -> Vec2 {
        let mut rng = rand::thread_rng();
        let jitter = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        (jitter * config.scatter_strength).limit(config.scatter_strength)
    }
}

/// A fixed-capacity flock for `no_std` targets.
///
/// Carries the deterministic force set (flocking, boundary, pointer
/// repulsion); click scatter needs a random source and lives on [`FlockStd`].
pub struct Flock<const N: usize> {
    pub agents: heapless::Vec<Agent, N>,
    pub config: FlockConfig,
    pub width: f32,
    pub height: f32,
}

impl<const N: usize> Flock<N> {
    pub fn new(width: f32, height: f32, config: FlockConfig) -> Self {
        Self {
            agents: heapless::Vec::new(),
            config,
            width,
            height,
        }
    }

    pub fn add_agent(&mut self, agent: Agent) -> Result<(), Agent> {
        self.agents.push(agent)
    }

    pub fn update(&mut self, dt: f32, pointer: Option<Vec2>) {
        let dt = dt.min(self.config.max_delta);
        let mut forces = heapless::Vec::<Vec2, N>::new();

        for agent in self.agents.iter() {
            let _ = forces.push(total_force(
                agent,
                self.agents.iter(),
                pointer,
                self.width,
                self.height,
                &self.config,
            ));
        }

        for (agent, force) in self.agents.iter_mut().zip(forces.iter()) {
            agent.apply_force(*force);
            agent.integrate(dt);
            agent.wrap_edges(self.width, self.height, self.config.wrap_margin);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

fn total_force<'a, I>(
    agent: &Agent,
    others: I,
    pointer: Option<Vec2>,
    width: f32,
    height: f32,
    config: &FlockConfig,
) -> Vec2
where
    I: Iterator<Item = &'a Agent> + Clone,
{
    let ali = behavior::alignment(agent, others.clone(), config) * config.alignment_weight;
    let coh = behavior::cohesion(agent, others.clone(), config) * config.cohesion_weight;
    let sep = behavior::separation(agent, others, config) * config.separation_weight;
    let bounds = behavior::boundary(agent, width, height, config);
    let repel = match pointer {
        Some(p) => behavior::pointer_repulsion(agent, p, config),
        None => Vec2::zero(),
    };
    ali + coh + sep + bounds + repel
}

/// The full-featured flock for `std` environments: random spawn and the
/// click-scatter window on top of the shared force set.
#[cfg(feature = "std")]
pub struct FlockStd {
    pub agents: Vec<Agent>,
    pub config: FlockConfig,
    pub width: f32,
    pub height: f32,
    /// Remaining seconds of post-click scatter; counts down each tick.
    pub scatter_remaining: f32,
}

#[cfg(feature = "std")]
impl FlockStd {
    pub fn new(width: f32, height: f32, count: usize, config: FlockConfig) -> Self {
        let agents = (0..count)
            .map(|_| Agent::spawn(width, height, &config))
            .collect();

        Self {
            agents,
            config,
            width,
            height,
            scatter_remaining: 0.0,
        }
    }

    /// Opens the scatter window; called on click.
    pub fn scatter(&mut self) {
        self.scatter_remaining = self.config.scatter_duration;
    }

    pub fn update(&mut self, dt: f32, pointer: Option<Vec2>) {
        let dt = dt.min(self.config.max_delta);
        let scattering = self.scatter_remaining > 0.0;

        let forces: Vec<Vec2> = self
            .agents
            .iter()
            .map(|agent| {
                let mut force = total_force(
                    agent,
                    self.agents.iter(),
                    pointer,
                    self.width,
                    self.height,
                    &self.config,
                );
                if scattering {
                    force += behavior::scatter_jitter(&self.config);
                }
                force
            })
            .collect();

        for (agent, force) in self.agents.iter_mut().zip(forces.iter()) {
            agent.apply_force(*force);
            agent.integrate(dt);
            agent.wrap_edges(self.width, self.height, self.config.wrap_margin);
        }

        if scattering {
            self.scatter_remaining = (self.scatter_remaining - dt).max(0.0);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}
