//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SHAKEBOX_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env, Serialized}};
use serde::{Serialize, Deserialize};
use shakebox_physics::{PhysicsSettings, VelocityLimits};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Physics world configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Initial values of the live-tunable settings
    #[serde(default)]
    pub settings: PhysicsSettings,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SHAKEBOX_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SHAKEBOX_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("SHAKEBOX_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title; the live object count is appended
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Physics Simulation".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub start_position: [f32; 3],
    /// Starting yaw in degrees (-90 looks down -Z)
    pub yaw: f32,
    /// Starting pitch in degrees
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Maximum pitch angle in degrees
    pub pitch_limit: f32,
    /// Movement speed (units per second)
    pub move_speed: f32,
    /// Arrow-key rotation speed (degrees per second)
    pub rotation_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 10.0, 17.5],
            yaw: -90.0,
            pitch: -20.0,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            pitch_limit: 89.0,
            move_speed: 5.0,
            rotation_speed: 50.0,
        }
    }
}

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector
    pub gravity: [f32; 3],
    /// Half-size of the walled box
    pub boundary_size: f32,
    pub wall_thickness: f32,
    pub wall_restitution: f32,
    pub wall_friction: f32,
    /// Engine step length in seconds
    pub fixed_timestep: f32,
    /// Maximum engine steps per frame
    pub max_substeps: u32,
    /// Linear speed below which a body is put to rest
    pub rest_linear_threshold: f32,
    /// Angular speed below which a body stops spinning
    pub rest_angular_threshold: f32,
    pub max_linear_speed: f32,
    pub max_angular_speed: f32,
    /// Where new objects appear
    pub spawn_position: [f32; 3],
    /// Minimum window speed that counts as a shake
    pub shake_threshold: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let world = shakebox_physics::PhysicsConfig::default();
        Self {
            gravity: world.gravity,
            boundary_size: world.boundary_size,
            wall_thickness: world.wall_thickness,
            wall_restitution: world.wall_restitution,
            wall_friction: world.wall_friction,
            fixed_timestep: world.fixed_timestep,
            max_substeps: world.max_substeps,
            rest_linear_threshold: world.limits.rest_linear,
            rest_angular_threshold: world.limits.rest_angular,
            max_linear_speed: world.limits.max_linear,
            max_angular_speed: world.limits.max_angular,
            spawn_position: [0.0, 2.0, 0.0],
            shake_threshold: 0.1,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics crate's world configuration
    pub fn to_physics_config(&self) -> shakebox_physics::PhysicsConfig {
        shakebox_physics::PhysicsConfig {
            gravity: self.gravity,
            boundary_size: self.boundary_size,
            wall_thickness: self.wall_thickness,
            wall_restitution: self.wall_restitution,
            wall_friction: self.wall_friction,
            fixed_timestep: self.fixed_timestep,
            max_substeps: self.max_substeps,
            limits: VelocityLimits {
                rest_linear: self.rest_linear_threshold,
                rest_angular: self.rest_angular_threshold,
                max_linear: self.max_linear_speed,
                max_angular: self.max_angular_speed,
            },
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Clear color [r, g, b, a], hidden behind the skybox
    pub background_color: [f32; 4],
    /// Point light position [x, y, z]
    pub light_position: [f32; 3],
    pub light_color: [f32; 3],
    /// Skybox color at the zenith
    pub sky_top_color: [f32; 3],
    /// Skybox color at the nadir
    pub sky_bottom_color: [f32; 3],
    /// Boundary wireframe color
    pub boundary_color: [f32; 3],
    pub sphere_latitudes: u32,
    pub sphere_longitudes: u32,
    /// Segments around cones and cylinders
    pub round_segments: u32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.1, 0.1, 0.1, 1.0],
            light_position: [5.0, 5.0, 5.0],
            light_color: [1.0, 1.0, 1.0],
            sky_top_color: [0.529, 0.808, 0.922],
            sky_bottom_color: [0.118, 0.565, 1.0],
            boundary_color: [1.0, 1.0, 1.0],
            sphere_latitudes: 32,
            sphere_longitudes: 32,
            round_segments: 32,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
