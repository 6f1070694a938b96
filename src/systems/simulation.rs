//! Simulation system
//!
//! Manages the per-frame simulation work:
//! - Delta time calculation
//! - Physics stepping
//! - Camera movement from held keys
//! - Turning the window-shake signal into impulses

use std::time::Instant;
use rand::Rng;
use shakebox_input::{CameraController, ShakeTracker};
use shakebox_physics::{PhysicsSettings, PhysicsWorld};
use shakebox_render::Camera;

/// Longest frame the simulation will account for
const MAX_FRAME_TIME: f32 = 0.25;

/// Result of a simulation update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Seconds covered by this frame
    pub dt: f32,
    /// Fixed physics steps taken
    pub substeps: u32,
}

/// Manages the simulation loop timing
pub struct SimulationSystem {
    last_frame: Instant,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Run one simulation frame using wall-clock time since the last one
    pub fn update(
        &mut self,
        world: &mut PhysicsWorld,
        camera: &mut Camera,
        controller: &mut CameraController,
    ) -> SimulationResult {
        let now = Instant::now();
        // Cap dt so a stall (window drag, focus loss) cannot explode the step count
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_TIME);
        self.last_frame = now;

        Self::advance(dt, world, camera, controller)
    }

    /// Advance physics and camera by an explicit `dt`
    pub fn advance(
        dt: f32,
        world: &mut PhysicsWorld,
        camera: &mut Camera,
        controller: &mut CameraController,
    ) -> SimulationResult {
        let substeps = world.step(dt);
        controller.update(camera, dt);
        SimulationResult { dt, substeps }
    }

    /// Apply a pending window shake to every object
    ///
    /// Nothing happens while the world is empty. Returns the number of
    /// bodies pushed.
    pub fn apply_shake<R: Rng + ?Sized>(
        world: &mut PhysicsWorld,
        tracker: &mut ShakeTracker,
        settings: &PhysicsSettings,
        rng: &mut R,
    ) -> usize {
        if world.is_empty() {
            return 0;
        }
        tracker
            .take()
            .map_or(0, |velocity| world.apply_shake(velocity, settings, rng))
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shakebox_physics::ShapeKind;
    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_default_construction() {
        let sim = SimulationSystem::default();
        assert!(sim.last_frame.elapsed().as_millis() < 100);
    }

    #[test]
    fn test_advance_steps_physics_and_camera() {
        let mut world = PhysicsWorld::new();
        let mut camera = Camera::default();
        let mut controller = CameraController::new();
        controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed);

        let start = camera.position;
        let result = SimulationSystem::advance(0.1, &mut world, &mut camera, &mut controller);
        assert!(result.substeps >= 5);
        assert!(camera.position.distance(start) > 0.0);
    }

    #[test]
    fn test_short_frame_reports_no_substeps() {
        let mut world = PhysicsWorld::new();
        let mut camera = Camera::default();
        let mut controller = CameraController::new();

        let result = SimulationSystem::advance(0.001, &mut world, &mut camera, &mut controller);
        assert_eq!(result.dt, 0.001);
        assert_eq!(result.substeps, 0);

        // The leftover time carries into the next frame
        let result = SimulationSystem::advance(0.016, &mut world, &mut camera, &mut controller);
        assert_eq!(result.substeps, 1);
    }

    #[test]
    fn test_shake_skipped_without_objects() {
        let mut world = PhysicsWorld::new();
        let mut tracker = ShakeTracker::default();
        tracker.on_window_moved(0, 0, true);
        tracker.on_window_moved(30, 0, true);
        let mut rng = StdRng::seed_from_u64(7);

        let pushed = SimulationSystem::apply_shake(
            &mut world,
            &mut tracker,
            &PhysicsSettings::default(),
            &mut rng,
        );
        assert_eq!(pushed, 0);
    }

    #[test]
    fn test_shake_consumes_signal() {
        let mut world = PhysicsWorld::new();
        let settings = PhysicsSettings::default();
        world.spawn(ShapeKind::Cube, [0.0, 2.0, 0.0], &settings);
        world.spawn(ShapeKind::Sphere, [1.0, 2.0, 0.0], &settings);

        let mut tracker = ShakeTracker::default();
        tracker.on_window_moved(0, 0, true);
        tracker.on_window_moved(40, -20, true);
        let mut rng = StdRng::seed_from_u64(7);

        let pushed = SimulationSystem::apply_shake(&mut world, &mut tracker, &settings, &mut rng);
        assert_eq!(pushed, 2);
        assert_eq!(tracker.velocity(), [0.0, 0.0]);

        let again = SimulationSystem::apply_shake(&mut world, &mut tracker, &settings, &mut rng);
        assert_eq!(again, 0);
    }
}
