//! Input handling for Shakebox
//!
//! This crate provides keyboard-polled camera control and the tracker that
//! turns window motion into a shake signal.

mod camera_controller;
mod shake;

pub use camera_controller::{CameraControl, CameraController};
pub use shake::ShakeTracker;
