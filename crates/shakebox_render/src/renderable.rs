//! Renderable instances - bridges the physics world to GPU instance data
//!
//! Objects are grouped by shape kind so each mesh is drawn with a single
//! instanced call.

use std::ops::Range;

use shakebox_physics::{ObjectTransform, PhysicsObject, PhysicsWorld, ShapeKind};

use crate::pipeline::types::InstanceRaw;

/// Instance data for every live object, contiguous per shape kind
#[derive(Clone, Debug, Default)]
pub struct ObjectInstances {
    instances: Vec<InstanceRaw>,
    ranges: [Range<u32>; 4],
}

impl ObjectInstances {
    /// Collect the current pose of every object in the world
    pub fn from_world(world: &PhysicsWorld) -> Self {
        Self::from_objects(world.object_transforms())
    }

    /// Collect instances from `(object, pose)` pairs
    pub fn from_objects<'a>(
        objects: impl IntoIterator<Item = (&'a PhysicsObject, ObjectTransform)>,
    ) -> Self {
        let mut buckets: [Vec<InstanceRaw>; 4] = Default::default();
        for (object, transform) in objects {
            buckets[kind_slot(object.kind)]
                .push(InstanceRaw::from_transform(&transform, object.color));
        }

        let mut result = Self::default();
        for (slot, bucket) in buckets.into_iter().enumerate() {
            let start = result.instances.len() as u32;
            result.instances.extend(bucket);
            result.ranges[slot] = start..result.instances.len() as u32;
        }
        result
    }

    /// All instances, ordered by shape kind
    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }

    /// Instance range to draw for one kind
    pub fn range(&self, kind: ShapeKind) -> Range<u32> {
        self.ranges[kind_slot(kind)].clone()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

fn kind_slot(kind: ShapeKind) -> usize {
    match kind {
        ShapeKind::Cube => 0,
        ShapeKind::Sphere => 1,
        ShapeKind::Cone => 2,
        ShapeKind::Cylinder => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakebox_physics::PhysicsSettings;

    #[test]
    fn test_empty_world() {
        let world = PhysicsWorld::new();
        let instances = ObjectInstances::from_world(&world);
        assert!(instances.is_empty());
        for kind in ShapeKind::ALL {
            assert!(instances.range(kind).is_empty());
        }
    }

    #[test]
    fn test_instances_grouped_by_kind() {
        let mut world = PhysicsWorld::new();
        let settings = PhysicsSettings::default();
        world.spawn(ShapeKind::Sphere, [0.0, 2.0, 0.0], &settings);
        world.spawn(ShapeKind::Cube, [1.0, 2.0, 0.0], &settings);
        world.spawn(ShapeKind::Sphere, [-1.0, 2.0, 0.0], &settings);
        world.spawn(ShapeKind::Cylinder, [0.0, 3.0, 0.0], &settings);

        let instances = ObjectInstances::from_world(&world);
        assert_eq!(instances.len(), 4);
        assert_eq!(instances.range(ShapeKind::Cube), 0..1);
        assert_eq!(instances.range(ShapeKind::Sphere), 1..3);
        assert_eq!(instances.range(ShapeKind::Cone), 3..3);
        assert_eq!(instances.range(ShapeKind::Cylinder), 3..4);
    }

    #[test]
    fn test_instance_carries_pose_and_color() {
        let mut world = PhysicsWorld::new();
        let settings = PhysicsSettings {
            cube_color: [0.1, 0.2, 0.3],
            ..Default::default()
        };
        world.spawn(ShapeKind::Cube, [1.0, 2.0, 3.0], &settings);

        let instances = ObjectInstances::from_world(&world);
        let raw = instances.instances()[0];
        assert_eq!(raw.color, [0.1, 0.2, 0.3, 1.0]);
        let t = raw.model[3];
        assert!((t[0] - 1.0).abs() < 1e-5);
        assert!((t[1] - 2.0).abs() < 1e-5);
        assert!((t[2] - 3.0).abs() < 1e-5);
    }
}
