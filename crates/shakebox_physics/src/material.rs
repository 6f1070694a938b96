//! Shape-dependent material properties

use crate::object::ShapeKind;
use crate::settings::PhysicsSettings;

/// How strongly rolling/spinning friction is folded into angular damping
///
/// The engine has no rolling or spinning friction, so both are approximated
/// by extra angular damping on the body.
pub const ROLLING_DAMPING_GAIN: f32 = 0.5;

/// Surface properties assigned to an object when it is spawned
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeMaterial {
    /// Friction coefficient (0.0 = ice, 1.0 = rubber)
    pub friction: f32,
    /// Restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
    /// Resistance to rolling
    pub rolling_friction: f32,
    /// Resistance to spinning about the contact normal
    pub spinning_friction: f32,
}

impl ShapeMaterial {
    /// Cones are grippy and dull so they settle on their base
    pub const CONE: Self = Self {
        friction: 0.9,
        restitution: 0.3,
        rolling_friction: 0.8,
        spinning_friction: 0.8,
    };

    /// Create a material, clamping every coefficient to [0.0, 1.0]
    pub fn new(
        friction: f32,
        restitution: f32,
        rolling_friction: f32,
        spinning_friction: f32,
    ) -> Self {
        Self {
            friction: friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
            rolling_friction: rolling_friction.clamp(0.0, 1.0),
            spinning_friction: spinning_friction.clamp(0.0, 1.0),
        }
    }

    /// Material taken from the live settings bag
    pub fn from_settings(settings: &PhysicsSettings) -> Self {
        Self::new(
            settings.friction,
            settings.restitution,
            settings.rolling_friction,
            settings.spinning_friction,
        )
    }

    /// Default material for a shape kind
    ///
    /// Cones keep their own constants; every other kind follows the settings.
    pub fn for_kind(kind: ShapeKind, settings: &PhysicsSettings) -> Self {
        match kind {
            ShapeKind::Cone => Self::CONE,
            ShapeKind::Cube | ShapeKind::Sphere | ShapeKind::Cylinder => {
                Self::from_settings(settings)
            }
        }
    }

    /// Angular damping for a body with this material
    pub fn angular_damping(&self, base_damping: f32) -> f32 {
        base_damping + self.rolling_friction.max(self.spinning_friction) * ROLLING_DAMPING_GAIN
    }
}
