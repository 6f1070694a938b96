//! Live physics objects and their shape kinds

use crate::settings::PhysicsSettings;
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
use slotmap::new_key_type;

new_key_type! {
    /// Key to a live object in the physics world
    ///
    /// Generational: once an object is removed its key resolves to nothing,
    /// even if the slot is later reused.
    pub struct ObjectKey;
}

/// The primitive shapes that can be spawned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cube,
    Sphere,
    Cone,
    Cylinder,
}

impl ShapeKind {
    /// Every kind, in spawn-button order
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Cube,
        ShapeKind::Sphere,
        ShapeKind::Cone,
        ShapeKind::Cylinder,
    ];

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cone => "Cone",
            ShapeKind::Cylinder => "Cylinder",
        }
    }

    /// Unscaled mass for this kind
    pub fn base_mass(self) -> f32 {
        match self {
            ShapeKind::Cube | ShapeKind::Cylinder => 1.0,
            ShapeKind::Sphere | ShapeKind::Cone => 0.8,
        }
    }

    /// Color given to a freshly spawned object of this kind
    pub fn color(self, settings: &PhysicsSettings) -> [f32; 3] {
        match self {
            ShapeKind::Cube => settings.cube_color,
            ShapeKind::Sphere => [0.2, 0.8, 0.3],
            ShapeKind::Cone | ShapeKind::Cylinder => [0.3, 0.2, 0.8],
        }
    }
}

/// A spawned rigid body as seen by the application
///
/// The handles are owned by the [`PhysicsWorld`](crate::PhysicsWorld) that
/// created the object and stay registered until the object is removed.
#[derive(Clone, Copy, Debug)]
pub struct PhysicsObject {
    pub kind: ShapeKind,
    pub color: [f32; 3],
    pub(crate) body: RigidBodyHandle,
    pub(crate) collider: ColliderHandle,
}

/// World-space pose of an object, ready for building a model matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectTransform {
    /// Translation (x, y, z)
    pub translation: [f32; 3],
    /// Rotation quaternion in (x, y, z, w) order
    pub rotation: [f32; 4],
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
