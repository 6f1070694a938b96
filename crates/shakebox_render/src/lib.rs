//! Rendering for Shakebox
//!
//! This crate provides the wgpu-based pipeline that draws the sandbox:
//! a gradient skybox, the live physics objects and the boundary wireframe.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::Camera`] - Yaw/pitch fly camera
//! - [`mesh`] - Procedural meshes for every shape kind
//! - [`pipeline::ScenePipeline`] - Skybox, lit objects and wireframe passes
//! - [`renderable::ObjectInstances`] - Converts the physics world to instance data

pub mod camera;
pub mod context;
pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod renderable;

pub use camera::{Camera, Projection};
pub use context::RenderContext;
pub use error::RenderError;
pub use mesh::{GpuMesh, MeshData};
pub use pipeline::{MeshDetail, ScenePipeline, SceneUniforms};
pub use renderable::ObjectInstances;
