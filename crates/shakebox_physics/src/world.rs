//! Physics world and simulation

use crate::material::ShapeMaterial;
use crate::object::{ObjectKey, ObjectTransform, PhysicsObject, ShapeKind};
use crate::policy::{shake_impulse, VelocityLimits};
use crate::settings::PhysicsSettings;
use rand::Rng;
use rapier3d::prelude::*;
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity acceleration vector
    pub gravity: [f32; 3],
    /// Half-size of the bounding box the walls enclose
    pub boundary_size: f32,
    /// Thickness of each boundary wall
    pub wall_thickness: f32,
    /// Bounciness of the walls
    pub wall_restitution: f32,
    /// Friction of the walls
    pub wall_friction: f32,
    /// Length of one engine step in seconds
    pub fixed_timestep: f32,
    /// Maximum engine steps per call to [`PhysicsWorld::step`]
    pub max_substeps: u32,
    /// Rest snapping and speed caps
    pub limits: VelocityLimits,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            boundary_size: 5.0,
            wall_thickness: 0.2,
            wall_restitution: 0.8,
            wall_friction: 0.1,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
            limits: VelocityLimits::default(),
        }
    }
}

/// The physics world: engine state plus the live sandbox objects
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Live objects (using generational keys)
    objects: SlotMap<ObjectKey, PhysicsObject>,
    /// Fixed body carrying the six boundary walls
    boundary: Option<RigidBodyHandle>,
    /// Simulated time not yet consumed by a fixed step
    accumulator: f32,
    /// Physics configuration
    config: PhysicsConfig,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(mut config: PhysicsConfig) -> Self {
        config.fixed_timestep = config.fixed_timestep.max(1.0e-4);
        config.max_substeps = config.max_substeps.max(1);

        let integration_parameters = IntegrationParameters {
            dt: config.fixed_timestep,
            ..IntegrationParameters::default()
        };

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            objects: SlotMap::with_key(),
            boundary: None,
            accumulator: 0.0,
            config,
        }
    }

    /// Physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Build the six walls of the bounding box
    ///
    /// Calling this again replaces the existing walls.
    pub fn create_boundary_walls(&mut self) {
        if let Some(old) = self.boundary.take() {
            self.remove_body(old);
        }

        let size = self.config.boundary_size;
        let span = size * 2.0;
        let thickness = self.config.wall_thickness;

        // (full extents, center) for each wall
        let walls = [
            ([thickness, span, span], [size, 0.0, 0.0]),
            ([thickness, span, span], [-size, 0.0, 0.0]),
            ([span, thickness, span], [0.0, size, 0.0]),
            ([span, thickness, span], [0.0, -size, 0.0]),
            ([span, span, thickness], [0.0, 0.0, size]),
            ([span, span, thickness], [0.0, 0.0, -size]),
        ];

        let handle = self.bodies.insert(RigidBodyBuilder::fixed().build());
        for (extents, center) in walls {
            let wall = ColliderBuilder::cuboid(extents[0] * 0.5, extents[1] * 0.5, extents[2] * 0.5)
                .translation(vector![center[0], center[1], center[2]])
                .restitution(self.config.wall_restitution)
                .friction(self.config.wall_friction)
                .restitution_combine_rule(CoefficientCombineRule::Multiply)
                .friction_combine_rule(CoefficientCombineRule::Multiply)
                .build();
            self.colliders.insert_with_parent(wall, handle, &mut self.bodies);
        }
        self.boundary = Some(handle);
    }

    /// Whether the boundary walls exist
    pub fn has_boundary(&self) -> bool {
        self.boundary.is_some()
    }

    /// Spawn an object of the given kind at `position`
    ///
    /// Mass, material and damping follow the shape's defaults and the
    /// current settings.
    pub fn spawn(
        &mut self,
        kind: ShapeKind,
        position: [f32; 3],
        settings: &PhysicsSettings,
    ) -> ObjectKey {
        let material = ShapeMaterial::for_kind(kind, settings);
        let mass = (kind.base_mass() * settings.mass_scale).max(0.01);

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .linear_damping(settings.damping)
            .angular_damping(material.angular_damping(settings.damping))
            .ccd_enabled(true)
            .can_sleep(false)
            .build();

        let collider = Self::collider_builder(kind)
            .restitution(material.restitution)
            .friction(material.friction)
            .restitution_combine_rule(CoefficientCombineRule::Multiply)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .mass(mass)
            .build();

        let body_handle = self.bodies.insert(body);
        let collider_handle =
            self.colliders.insert_with_parent(collider, body_handle, &mut self.bodies);

        let key = self.objects.insert(PhysicsObject {
            kind,
            color: kind.color(settings),
            body: body_handle,
            collider: collider_handle,
        });
        log::info!("Spawned {} ({} live)", kind.label(), self.objects.len());
        key
    }

    /// Collision shape for a kind, sized to match its render mesh
    fn collider_builder(kind: ShapeKind) -> ColliderBuilder {
        match kind {
            ShapeKind::Cube => ColliderBuilder::cuboid(0.5, 0.5, 0.5),
            ShapeKind::Sphere => ColliderBuilder::ball(0.5),
            ShapeKind::Cone => ColliderBuilder::cone(0.5, 0.4),
            ShapeKind::Cylinder => ColliderBuilder::cylinder(0.5, 0.5),
        }
    }

    /// Remove an object and release its engine handles
    pub fn remove_object(&mut self, key: ObjectKey) -> Option<PhysicsObject> {
        let object = self.objects.remove(key)?;
        self.remove_body(object.body);
        Some(object)
    }

    /// Remove every live object, returning how many were removed
    pub fn clear_objects(&mut self) -> usize {
        let keys: Vec<ObjectKey> = self.objects.keys().collect();
        let count = keys.len();
        for key in keys {
            self.remove_object(key);
        }
        if count > 0 {
            log::info!("Cleared {} objects", count);
        }
        count
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Velocities are clamped once, then the engine runs as many fixed steps
    /// as the accumulated time allows, up to `max_substeps`. Time beyond that
    /// is dropped. Returns the number of engine steps taken.
    pub fn step(&mut self, dt: f32) -> u32 {
        self.clamp_velocities();

        let fixed = self.config.fixed_timestep;
        self.accumulator += dt.max(0.0);

        let mut substeps = 0;
        while self.accumulator >= fixed && substeps < self.config.max_substeps {
            self.pipeline.step(
                &vector![
                    self.config.gravity[0],
                    self.config.gravity[1],
                    self.config.gravity[2]
                ],
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
            self.accumulator -= fixed;
            substeps += 1;
        }

        if self.accumulator >= fixed {
            log::debug!("Dropping {:.3}s of simulation time", self.accumulator);
            self.accumulator %= fixed;
        }

        substeps
    }

    /// Snap resting bodies to zero and cap runaway speeds
    fn clamp_velocities(&mut self) {
        let limits = self.config.limits;
        for (_handle, body) in self.bodies.iter_mut() {
            if !body.is_dynamic() {
                continue;
            }
            let (linvel, angvel) = limits.apply(*body.linvel(), *body.angvel());
            body.set_linvel(linvel, false);
            body.set_angvel(angvel, false);
        }
    }

    /// Push every live object with the impulse derived from a window motion
    ///
    /// Returns the number of bodies that received an impulse.
    pub fn apply_shake<R: Rng + ?Sized>(
        &mut self,
        window_velocity: [f32; 2],
        settings: &PhysicsSettings,
        rng: &mut R,
    ) -> usize {
        let mut pushed = 0;
        for object in self.objects.values() {
            if let Some(body) = self.bodies.get_mut(object.body) {
                let shake = shake_impulse(window_velocity, body.mass(), settings, rng);
                body.apply_impulse(shake.impulse, true);
                body.apply_torque_impulse(shake.torque, true);
                pushed += 1;
            }
        }
        log::debug!(
            "Shake ({:.1}, {:.1}) applied to {} bodies",
            window_velocity[0],
            window_velocity[1],
            pushed
        );
        pushed
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Whether there are no live objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of rigid bodies registered with the engine (walls included)
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders registered with the engine (walls included)
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Get an object by key
    pub fn get_object(&self, key: ObjectKey) -> Option<&PhysicsObject> {
        self.objects.get(key)
    }

    /// Current pose of every live object, for rendering
    pub fn object_transforms(
        &self,
    ) -> impl Iterator<Item = (&PhysicsObject, ObjectTransform)> + '_ {
        self.objects.values().filter_map(move |object| {
            self.bodies
                .get(object.body)
                .map(|body| (object, Self::transform_of(body)))
        })
    }

    /// Current pose of one object
    pub fn transform(&self, key: ObjectKey) -> Option<ObjectTransform> {
        self.body(key).map(Self::transform_of)
    }

    fn transform_of(body: &RigidBody) -> ObjectTransform {
        let iso = body.position();
        let t = iso.translation.vector;
        let q = iso.rotation.coords;
        ObjectTransform {
            translation: [t.x, t.y, t.z],
            rotation: [q.x, q.y, q.z, q.w],
        }
    }

    fn body(&self, key: ObjectKey) -> Option<&RigidBody> {
        self.objects.get(key).and_then(|o| self.bodies.get(o.body))
    }

    fn body_mut(&mut self, key: ObjectKey) -> Option<&mut RigidBody> {
        let handle = self.objects.get(key)?.body;
        self.bodies.get_mut(handle)
    }

    /// Mass of an object's body
    pub fn mass(&self, key: ObjectKey) -> Option<f32> {
        self.body(key).map(|b| b.mass())
    }

    /// Linear velocity of an object
    pub fn linear_velocity(&self, key: ObjectKey) -> Option<[f32; 3]> {
        self.body(key).map(|b| {
            let v = b.linvel();
            [v.x, v.y, v.z]
        })
    }

    /// Angular velocity of an object
    pub fn angular_velocity(&self, key: ObjectKey) -> Option<[f32; 3]> {
        self.body(key).map(|b| {
            let v = b.angvel();
            [v.x, v.y, v.z]
        })
    }

    /// Set the linear velocity of an object. Returns false for a stale key.
    pub fn set_linear_velocity(&mut self, key: ObjectKey, velocity: [f32; 3]) -> bool {
        match self.body_mut(key) {
            Some(body) => {
                body.set_linvel(vector![velocity[0], velocity[1], velocity[2]], true);
                true
            }
            None => false,
        }
    }

    /// Set the angular velocity of an object. Returns false for a stale key.
    pub fn set_angular_velocity(&mut self, key: ObjectKey, velocity: [f32; 3]) -> bool {
        match self.body_mut(key) {
            Some(body) => {
                body.set_angvel(vector![velocity[0], velocity[1], velocity[2]], true);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world_with_walls() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.create_boundary_walls();
        world
    }

    #[test]
    fn test_boundary_walls() {
        let world = world_with_walls();
        assert!(world.has_boundary());
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 6);
    }

    #[test]
    fn test_boundary_walls_replaced_not_duplicated() {
        let mut world = world_with_walls();
        world.create_boundary_walls();
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 6);
    }

    #[test]
    fn test_spawn_registers_body_and_collider() {
        let mut world = world_with_walls();
        let key = world.spawn(ShapeKind::Cube, [0.0, 2.0, 0.0], &PhysicsSettings::default());

        assert_eq!(world.object_count(), 1);
        assert_eq!(world.body_count(), 2);
        assert_eq!(world.collider_count(), 7);

        let object = world.get_object(key).unwrap();
        assert_eq!(object.kind, ShapeKind::Cube);
        assert_eq!(object.color, PhysicsSettings::default().cube_color);
        assert_eq!(world.transform(key).unwrap().translation, [0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_spawn_mass_follows_kind_and_scale() {
        let mut world = PhysicsWorld::new();
        let settings = PhysicsSettings {
            mass_scale: 2.0,
            ..PhysicsSettings::default()
        };
        let sphere = world.spawn(ShapeKind::Sphere, [0.0; 3], &settings);
        let mass = world.mass(sphere).unwrap();
        assert!((mass - 1.6).abs() < 1e-3, "mass was {}", mass);
    }

    #[test]
    fn test_remove_object_releases_handles() {
        let mut world = world_with_walls();
        let key = world.spawn(ShapeKind::Sphere, [0.0; 3], &PhysicsSettings::default());

        let removed = world.remove_object(key).unwrap();
        assert_eq!(removed.kind, ShapeKind::Sphere);
        assert_eq!(world.object_count(), 0);
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 6);

        // Stale key resolves to nothing
        assert!(world.remove_object(key).is_none());
        assert!(world.linear_velocity(key).is_none());
        assert!(!world.set_linear_velocity(key, [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_clear_objects() {
        let mut world = world_with_walls();
        let settings = PhysicsSettings::default();
        for kind in ShapeKind::ALL {
            world.spawn(kind, [0.0, 2.0, 0.0], &settings);
        }
        assert_eq!(world.clear_objects(), 4);
        assert!(world.is_empty());
        assert!(world.has_boundary());
        assert_eq!(world.clear_objects(), 0);
    }

    #[test]
    fn test_step_uses_fixed_substeps() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.step(0.0), 0);
        assert_eq!(world.step(1.0 / 60.0 + 1e-4), 1);
        // Far more time than max_substeps can consume
        assert_eq!(world.step(5.0), world.config().max_substeps);
        // Surplus was dropped, not carried over
        assert!(world.step(0.0) <= 1);
    }

    #[test]
    fn test_objects_fall_under_gravity() {
        let mut world = world_with_walls();
        let key = world.spawn(ShapeKind::Cube, [0.0, 2.0, 0.0], &PhysicsSettings::default());
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        assert!(world.transform(key).unwrap().translation[1] < 2.0);
        assert!(world.linear_velocity(key).unwrap()[1] < 0.0);
    }

    #[test]
    fn test_step_clamps_runaway_velocity() {
        let mut world = PhysicsWorld::new();
        let key = world.spawn(ShapeKind::Sphere, [0.0; 3], &PhysicsSettings::default());
        world.set_linear_velocity(key, [100.0, 0.0, 0.0]);
        world.set_angular_velocity(key, [0.0, 50.0, 0.0]);
        world.step(0.0);

        let v = world.linear_velocity(key).unwrap();
        let w = world.angular_velocity(key).unwrap();
        assert!((v[0] - 30.0).abs() < 1e-3);
        assert!((w[1] - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_step_snaps_resting_velocity() {
        let mut world = PhysicsWorld::new();
        let key = world.spawn(ShapeKind::Cube, [0.0; 3], &PhysicsSettings::default());
        world.set_linear_velocity(key, [0.001, 0.0, 0.0]);
        world.set_angular_velocity(key, [0.0, 0.0, 0.005]);
        world.step(0.0);

        assert_eq!(world.linear_velocity(key).unwrap(), [0.0; 3]);
        assert_eq!(world.angular_velocity(key).unwrap(), [0.0; 3]);
    }

    #[test]
    fn test_apply_shake_pushes_every_object() {
        let mut world = world_with_walls();
        let settings = PhysicsSettings::default();
        let a = world.spawn(ShapeKind::Cube, [-1.0, 0.0, 0.0], &settings);
        let b = world.spawn(ShapeKind::Sphere, [1.0, 0.0, 0.0], &settings);

        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(world.apply_shake([4.0, 0.0], &settings, &mut rng), 2);
        assert!(world.linear_velocity(a).unwrap()[0] > 0.0);
        assert!(world.linear_velocity(b).unwrap()[0] > 0.0);
    }

    #[test]
    fn test_apply_shake_on_empty_world() {
        let mut world = world_with_walls();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(world.apply_shake([4.0, 4.0], &PhysicsSettings::default(), &mut rng), 0);
    }
}
