//! Application systems
//!
//! Window, simulation and rendering concerns split out of the application
//! handler in `main.rs`.

mod render;
mod simulation;
mod window;

pub use render::RenderSystem;
pub use simulation::{SimulationResult, SimulationSystem};
pub use window::{WindowError, WindowSystem};
