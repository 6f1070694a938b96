//! Yaw/pitch fly camera
//!
//! Orientation is stored as yaw and pitch in degrees; the `front`, `right`
//! and `up` vectors are derived from them whenever either changes.

use glam::{Mat4, Vec3};
use shakebox_input::CameraControl;

const WORLD_UP: Vec3 = Vec3::Y;

/// Fly camera for viewing the sandbox
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    /// Degrees, -90 looks down -Z
    yaw: f32,
    /// Degrees, clamped to ±pitch_limit
    pitch: f32,
    pitch_limit: f32,
    start: (Vec3, f32, f32),
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 10.0, 17.5), -90.0, -20.0)
    }
}

impl Camera {
    /// Create a camera at `position` looking along yaw/pitch (degrees)
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: WORLD_UP,
            right: Vec3::X,
            yaw,
            pitch,
            pitch_limit: 89.0,
            start: (position, yaw, pitch),
        };
        camera.pitch = camera.pitch.clamp(-camera.pitch_limit, camera.pitch_limit);
        camera.update_vectors();
        camera
    }

    /// Builder: set the maximum pitch magnitude in degrees
    pub fn with_pitch_limit(mut self, limit: f32) -> Self {
        self.pitch_limit = limit.clamp(0.0, 89.9);
        self.pitch = self.pitch.clamp(-self.pitch_limit, self.pitch_limit);
        self.update_vectors();
        self
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Change yaw and pitch by the given degrees
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-self.pitch_limit, self.pitch_limit);
        self.update_vectors();
    }

    /// Return to the pose the camera was created with
    pub fn reset(&mut self) {
        let (position, yaw, pitch) = self.start;
        self.position = position;
        self.yaw = yaw;
        self.pitch = pitch;
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front, self.up)
    }

    /// View matrix with the translation removed, for the skybox
    pub fn rotation_view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(Vec3::ZERO, self.front, self.up)
    }
}

impl CameraControl for Camera {
    fn move_forward(&mut self, delta: f32) {
        self.position += self.front * delta;
    }

    fn move_right(&mut self, delta: f32) {
        self.position += self.right * delta;
    }

    fn move_up(&mut self, delta: f32) {
        self.position += self.up * delta;
    }

    fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        Camera::rotate(self, delta_yaw, delta_pitch);
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

/// Perspective projection parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    /// Projection matrix for a surface aspect ratio (depth range 0..1)
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect, self.near, self.far)
    }
}
