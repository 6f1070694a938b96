//! Camera controller for keyboard-driven fly-through
//!
//! Controls:
//! - W/S: Forward/backward along the view direction
//! - A/D: Left/right strafe
//! - Space/Left Shift: Up/down along the camera's up vector
//! - Arrow keys: Yaw (left/right) and pitch (up/down)

use glam::Vec3;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Camera controller for handling input
///
/// Key events only record which keys are held; [`CameraController::update`]
/// polls that state once per frame and moves the camera.
pub struct CameraController {
    // Movement state
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,

    // Rotation state
    yaw_left: bool,
    yaw_right: bool,
    pitch_up: bool,
    pitch_down: bool,

    // Configuration
    pub move_speed: f32,
    /// Degrees per second
    pub rotation_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            up: false,
            down: false,

            yaw_left: false,
            yaw_right: false,
            pitch_up: false,
            pitch_down: false,

            move_speed: 5.0,
            rotation_speed: 50.0,
        }
    }

    /// Process keyboard input
    ///
    /// Returns true if the key is one the controller handles.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::KeyW => { self.forward = pressed; true }
            KeyCode::KeyS => { self.backward = pressed; true }
            KeyCode::KeyA => { self.left = pressed; true }
            KeyCode::KeyD => { self.right = pressed; true }
            KeyCode::Space => { self.up = pressed; true }
            KeyCode::ShiftLeft => { self.down = pressed; true }
            KeyCode::ArrowLeft => { self.yaw_left = pressed; true }
            KeyCode::ArrowRight => { self.yaw_right = pressed; true }
            KeyCode::ArrowUp => { self.pitch_up = pressed; true }
            KeyCode::ArrowDown => { self.pitch_down = pressed; true }
            _ => false,
        }
    }

    /// Move and rotate the camera according to the held keys
    ///
    /// Returns the camera position after the update.
    pub fn update<C: CameraControl>(&mut self, camera: &mut C, dt: f32) -> Vec3 {
        let (forward, right, up) = self.movement_input();
        let velocity = self.move_speed * dt;

        if forward != 0.0 {
            camera.move_forward(forward * velocity);
        }
        if right != 0.0 {
            camera.move_right(right * velocity);
        }
        if up != 0.0 {
            camera.move_up(up * velocity);
        }

        let (yaw, pitch) = self.rotation_input();
        if yaw != 0.0 || pitch != 0.0 {
            let step = self.rotation_speed * dt;
            camera.rotate(yaw * step, pitch * step);
        }

        camera.position()
    }

    /// Raw (forward, right, up) input in the range -1.0 to 1.0
    pub fn movement_input(&self) -> (f32, f32, f32) {
        let forward = (self.forward as i32 - self.backward as i32) as f32;
        let right = (self.right as i32 - self.left as i32) as f32;
        let up = (self.up as i32 - self.down as i32) as f32;
        (forward, right, up)
    }

    /// Raw (yaw, pitch) input in the range -1.0 to 1.0
    pub fn rotation_input(&self) -> (f32, f32) {
        let yaw = (self.yaw_right as i32 - self.yaw_left as i32) as f32;
        let pitch = (self.pitch_up as i32 - self.pitch_down as i32) as f32;
        (yaw, pitch)
    }

    /// Check if any movement or rotation key is held
    pub fn is_active(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
            || self.yaw_left || self.yaw_right || self.pitch_up || self.pitch_down
    }

    /// Track window focus. Losing focus releases every held key, since the
    /// matching key-up events go to whichever window gained focus.
    pub fn on_focus_changed(&mut self, focused: bool) {
        if !focused && self.is_active() {
            log::debug!("Focus lost, releasing held camera keys");
            self.release_all();
        }
    }

    /// Forget every held key
    pub fn release_all(&mut self) {
        let move_speed = self.move_speed;
        let rotation_speed = self.rotation_speed;
        *self = Self {
            move_speed,
            rotation_speed,
            ..Self::new()
        };
    }

    /// Builder: set movement speed
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Builder: set rotation speed in degrees per second
    pub fn with_rotation_speed(mut self, speed: f32) -> Self {
        self.rotation_speed = speed;
        self
    }
}

/// Trait for camera control
/// Allows the controller to work with different camera implementations
pub trait CameraControl {
    fn move_forward(&mut self, delta: f32);
    fn move_right(&mut self, delta: f32);
    fn move_up(&mut self, delta: f32);
    /// Rotate by yaw/pitch deltas in degrees
    fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32);
    fn position(&self) -> Vec3;
}
