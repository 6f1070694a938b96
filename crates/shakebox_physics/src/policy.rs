//! Numeric policies layered on top of the physics engine
//!
//! - Velocity clamping: snap near-resting bodies to rest and cap runaway speeds
//! - Window shake: map the window's on-screen motion to an impulse and torque

use crate::settings::PhysicsSettings;
use rand::Rng;
use rapier3d::prelude::{nalgebra, vector, Real, Vector};

/// Multiplier turning pixels-per-frame of window motion into impulse units
pub const SHAKE_FORCE_GAIN: f32 = 300.0;

/// Torque per pixel of window motion (X and Y axes)
const SHAKE_TORQUE_GAIN: f32 = 0.5;

/// Torque per pixel of window motion about the Z axis
const SHAKE_ROLL_GAIN: f32 = 0.25;

/// How much a body's mass amplifies its shake torque
const SHAKE_MASS_FACTOR: f32 = 0.8;

/// Size of one step of the random torque perturbation
const PERTURBATION_STEP: f32 = 0.001;

/// Speed thresholds applied to every dynamic body before each step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityLimits {
    /// Linear speeds below this snap to zero
    pub rest_linear: f32,
    /// Angular speeds below this snap to zero
    pub rest_angular: f32,
    /// Linear speeds above this are scaled down to it
    pub max_linear: f32,
    /// Angular speeds above this are scaled down to it
    pub max_angular: f32,
}

impl Default for VelocityLimits {
    fn default() -> Self {
        Self {
            rest_linear: 0.01,
            rest_angular: 0.01,
            max_linear: 30.0,
            max_angular: 15.0,
        }
    }
}

impl VelocityLimits {
    /// Clamp a (linear, angular) velocity pair
    pub fn apply(
        &self,
        linvel: Vector<Real>,
        angvel: Vector<Real>,
    ) -> (Vector<Real>, Vector<Real>) {
        (
            clamp_speed(linvel, self.rest_linear, self.max_linear),
            clamp_speed(angvel, self.rest_angular, self.max_angular),
        )
    }
}

/// Zero `v` if its length is below `rest`, rescale it to `max` if above
///
/// Direction is preserved when rescaling; anything in between is returned
/// unchanged.
pub fn clamp_speed(v: Vector<Real>, rest: f32, max: f32) -> Vector<Real> {
    let speed = v.norm();
    if speed < rest {
        Vector::zeros()
    } else if speed > max {
        v * (max / speed)
    } else {
        v
    }
}

/// Impulses produced by one window-shake event for one body
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShakeImpulse {
    /// Impulse applied at the center of mass
    pub impulse: Vector<Real>,
    /// Angular impulse, including the random perturbation
    pub torque: Vector<Real>,
}

/// Map a window velocity (pixels per frame, screen Y down) to body impulses
///
/// The central impulse scales each axis by its own gain and the overall
/// force scale. Moving the window down pushes bodies down (−Y) and towards
/// the viewer (+Z). The torque is mass-scaled, capped at
/// `settings.max_torque`, then perturbed by a small random torque so bodies
/// resting on an edge or face get knocked off balance.
pub fn shake_impulse<R: Rng + ?Sized>(
    window_velocity: [f32; 2],
    mass: f32,
    settings: &PhysicsSettings,
    rng: &mut R,
) -> ShakeImpulse {
    let [wx, wy] = window_velocity;
    let gain = settings.force_scale * SHAKE_FORCE_GAIN;

    let impulse = vector![
        wx * settings.horizontal_scale * gain,
        -wy * settings.vertical_scale * gain,
        wy * settings.z_scale * gain
    ];

    let mut torque = vector![
        wy * SHAKE_TORQUE_GAIN,
        wx * SHAKE_TORQUE_GAIN,
        (wx + wy) * SHAKE_ROLL_GAIN
    ] * (mass * SHAKE_MASS_FACTOR);

    let max_torque = settings.max_torque.max(0.0);
    let magnitude = torque.norm();
    if magnitude > max_torque {
        torque *= max_torque / magnitude;
    }

    let perturbation = vector![
        rng.gen_range(-50i32..50) as f32 * PERTURBATION_STEP,
        rng.gen_range(-50i32..50) as f32 * PERTURBATION_STEP,
        rng.gen_range(-50i32..50) as f32 * PERTURBATION_STEP
    ];

    ShakeImpulse {
        impulse,
        torque: torque + perturbation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_clamp_snaps_slow_velocity_to_rest() {
        let v = clamp_speed(vector![0.005, 0.0, 0.0], 0.01, 30.0);
        assert_eq!(v, Vector::zeros());
    }

    #[test]
    fn test_clamp_leaves_normal_speed_untouched() {
        let original = vector![1.0, -2.0, 3.0];
        assert_eq!(clamp_speed(original, 0.01, 30.0), original);
    }

    #[test]
    fn test_clamp_caps_speed_preserving_direction() {
        let original = vector![30.0, 40.0, 0.0];
        let clamped = clamp_speed(original, 0.01, 30.0);
        assert!((clamped.norm() - 30.0).abs() < EPSILON);
        assert!((clamped.normalize() - original.normalize()).norm() < EPSILON);
    }

    #[test]
    fn test_limits_apply_separately() {
        let limits = VelocityLimits::default();
        let (lin, ang) = limits.apply(vector![0.0, 100.0, 0.0], vector![0.001, 0.0, 0.0]);
        assert!((lin.y - 30.0).abs() < EPSILON);
        assert_eq!(ang, Vector::zeros());

        let (_, ang) = limits.apply(Vector::zeros(), vector![0.0, 0.0, -20.0]);
        assert!((ang.z + 15.0).abs() < EPSILON);
    }

    #[test]
    fn test_shake_impulse_axes_and_signs() {
        let settings = PhysicsSettings::default();
        let mut rng = StdRng::seed_from_u64(7);
        let shake = shake_impulse([2.0, 1.0], 1.0, &settings, &mut rng);

        let gain = settings.force_scale * SHAKE_FORCE_GAIN;
        assert!((shake.impulse.x - 2.0 * gain).abs() < EPSILON);
        assert!((shake.impulse.y + 1.0 * gain).abs() < EPSILON);
        assert!((shake.impulse.z - 1.0 * gain).abs() < EPSILON);
    }

    #[test]
    fn test_shake_impulse_per_axis_gains() {
        let settings = PhysicsSettings {
            horizontal_scale: 2.0,
            vertical_scale: 0.5,
            z_scale: 0.0,
            ..PhysicsSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let shake = shake_impulse([1.0, 1.0], 1.0, &settings, &mut rng);

        let gain = settings.force_scale * SHAKE_FORCE_GAIN;
        assert!((shake.impulse.x - 2.0 * gain).abs() < EPSILON);
        assert!((shake.impulse.y + 0.5 * gain).abs() < EPSILON);
        assert_eq!(shake.impulse.z, 0.0);
    }

    #[test]
    fn test_shake_torque_is_capped() {
        let settings = PhysicsSettings::default();
        let mut rng = StdRng::seed_from_u64(3);
        let shake = shake_impulse([500.0, -300.0], 1.0, &settings, &mut rng);

        // Cap plus the largest possible perturbation
        let bound = settings.max_torque + 0.05 * 3f32.sqrt();
        assert!(shake.torque.norm() <= bound);
        assert!(shake.torque.norm() >= settings.max_torque - 0.05 * 3f32.sqrt());
    }

    #[test]
    fn test_zero_signal_yields_only_perturbation() {
        let settings = PhysicsSettings::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let shake = shake_impulse([0.0, 0.0], 1.0, &settings, &mut rng);
            assert_eq!(shake.impulse, Vector::zeros());
            for c in shake.torque.iter() {
                assert!(*c >= -0.05 - EPSILON && *c <= 0.049 + EPSILON);
            }
        }
    }

    #[test]
    fn test_torque_scales_with_mass() {
        let settings = PhysicsSettings::default();
        // Same seed gives the same perturbation, so the difference is the mass term
        let light = shake_impulse([1.0, 0.0], 0.5, &settings, &mut StdRng::seed_from_u64(9));
        let heavy = shake_impulse([1.0, 0.0], 1.0, &settings, &mut StdRng::seed_from_u64(9));
        let delta = heavy.torque - light.torque;
        assert!((delta.y - 0.5 * SHAKE_TORQUE_GAIN * SHAKE_MASS_FACTOR).abs() < EPSILON);
    }
}
