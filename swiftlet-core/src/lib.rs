#![cfg_attr(not(feature = "std"), no_std)]

//! Simulation core for the swiftlet canvas animations: 2D vector math, a
//! flocking model with pointer interaction, a perching finite-state-machine
//! bird, and the sprite-sheet frame animator that follows it.
//!
//! Everything here is renderer-agnostic. Callers own the frame loop, feed in
//! elapsed seconds plus pointer/perch data each tick, and read positions,
//! angles and sprite frames back out for drawing.

pub mod bird;
pub mod flock;
pub mod perch;
pub mod sprite;
pub mod vec2;

pub use bird::{Bird, BirdConfig, BirdState};
pub use flock::{behavior, Agent, Flock, FlockConfig};
#[cfg(feature = "std")]
pub use flock::FlockStd;
pub use perch::{PerchSource, SlicePerchSource};
pub use sprite::{Sequence, SequenceTable};
pub use vec2::{lerp, lerp_angle, Vec2};
