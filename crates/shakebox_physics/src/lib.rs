//! Rigid-body sandbox physics for Shakebox
//!
//! This crate wraps `rapier3d` with the small amount of policy the sandbox
//! layers on top of the engine:
//! - A live-tunable settings bag ([`PhysicsSettings`])
//! - Shape kinds and their default materials
//! - Velocity clamping and the window-shake impulse mapping
//! - A [`PhysicsWorld`] owning the engine state and the live objects

pub mod material;
pub mod object;
pub mod policy;
pub mod settings;
pub mod world;

// Re-export commonly used types
pub use material::{ShapeMaterial, ROLLING_DAMPING_GAIN};
pub use object::{ObjectKey, ObjectTransform, PhysicsObject, ShapeKind};
pub use policy::{clamp_speed, shake_impulse, ShakeImpulse, VelocityLimits, SHAKE_FORCE_GAIN};
pub use settings::PhysicsSettings;
pub use world::{PhysicsConfig, PhysicsWorld};
