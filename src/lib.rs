//! Shakebox - a window-shake rigid-body sandbox
//!
//! Library half of the application: configuration, GUI panels, input
//! mapping and the per-frame systems driven by the binary.

pub mod config;
pub mod gui;
pub mod input;
pub mod systems;
