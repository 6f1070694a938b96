//! Live-tunable physics settings

use serde::{Deserialize, Serialize};

/// Tunable constants edited through the GUI while the simulation runs
///
/// Read when objects are spawned (material and mass) and every time a
/// window-shake impulse is applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Overall gain applied to the window-shake signal
    pub force_scale: f32,
    /// Gain on the horizontal (X) impulse component
    pub horizontal_scale: f32,
    /// Gain on the vertical (Y) impulse component
    pub vertical_scale: f32,
    /// Gain on the depth (Z) impulse component
    pub z_scale: f32,
    /// Cap on the magnitude of the shake torque impulse
    pub max_torque: f32,
    /// Bounciness of newly spawned objects (0.0 = none, 1.0 = perfect)
    pub restitution: f32,
    /// Sliding friction of newly spawned objects
    pub friction: f32,
    /// Rolling friction of newly spawned objects
    pub rolling_friction: f32,
    /// Spinning friction of newly spawned objects
    pub spinning_friction: f32,
    /// Linear and angular damping ("air resistance")
    pub damping: f32,
    /// Multiplier on every shape's default mass
    pub mass_scale: f32,
    /// Color given to newly spawned cubes
    pub cube_color: [f32; 3],
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            force_scale: 0.01,
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            z_scale: 1.0,
            max_torque: 8.0,
            restitution: 0.5,
            friction: 0.5,
            rolling_friction: 0.1,
            spinning_friction: 0.4,
            damping: 0.1,
            mass_scale: 1.0,
            cube_color: [0.8, 0.3, 0.2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PhysicsSettings::default();
        assert_eq!(settings.force_scale, 0.01);
        assert_eq!(settings.restitution, 0.5);
        assert_eq!(settings.damping, 0.1);
        assert_eq!(settings.cube_color, [0.8, 0.3, 0.2]);
    }
}
