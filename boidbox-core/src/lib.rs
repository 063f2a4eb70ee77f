#![cfg_attr(not(feature = "std"), no_std)]

//! Simulation core for a flock of wandering boids kept inside a box.
//!
//! Agents never look at each other. Every tick each one perturbs its wander
//! angle, is pushed back from any wall it is about to cross, and integrates
//! a clamped steering force into a clamped velocity. Hosts own the
//! configuration and call [`FlockState::rebuild`] when a parameter that
//! shapes the flock changes.

pub mod agent;
pub mod config;
pub mod error;
pub mod flock;
mod math;
pub mod steering;
pub mod vector;

pub use agent::{Agent, ModelKind};
pub use config::{Boundaries, JitterMode, SimulationConfig, MAX_POPULATION};
pub use error::{ConfigError, FlockError};
pub use flock::{spawn_agent, FixedFlock};
#[cfg(feature = "std")]
pub use flock::FlockState;
pub use steering::{SteeringEngine, StepReport, TickParams};
pub use vector::Vector3D;
