//! Rendering pipeline components
//!
//! GPU data layouts shared with the WGSL sources, and the pipeline that
//! draws the skybox, the objects and the boundary.

pub mod scene_pipeline;
pub mod types;

pub use scene_pipeline::{MeshDetail, ScenePipeline};
pub use types::{InstanceRaw, SceneUniforms, Vertex};
