//! GPU-compatible data types for the scene pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use shakebox_physics::ObjectTransform;

use crate::camera::{Camera, Projection};

/// A mesh vertex with position and surface normal
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Layout for vertex buffer slot 0
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Per-object instance data: model matrix columns and color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    /// Instance for a rigid pose
    pub fn from_transform(transform: &ObjectTransform, color: [f32; 3]) -> Self {
        let [x, y, z, w] = transform.rotation;
        let model = Mat4::from_rotation_translation(
            Quat::from_xyzw(x, y, z, w).normalize(),
            Vec3::from(transform.translation),
        );
        Self::from_matrix(model, color)
    }

    pub fn from_matrix(model: Mat4, color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
        }
    }

    /// Layout for vertex buffer slot 1 (per instance)
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Uniforms shared by the skybox and scene shaders
/// Layout: 224 bytes total (must match `SceneUniforms` in the WGSL sources)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: [[f32; 4]; 4],
    /// Projection * rotation-only view, for the skybox (64 bytes)
    pub sky_view_proj: [[f32; 4]; 4],
    /// Camera position, w unused
    pub camera_pos: [f32; 4],
    /// Point light position, w unused
    pub light_pos: [f32; 4],
    pub light_color: [f32; 4],
    pub sky_top: [f32; 4],
    pub sky_bottom: [f32; 4],
    /// Boundary wireframe color
    pub line_color: [f32; 4],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_proj: identity,
            sky_view_proj: identity,
            camera_pos: [0.0, 0.0, 0.0, 1.0],
            light_pos: [5.0, 5.0, 5.0, 1.0],
            light_color: [1.0, 1.0, 1.0, 1.0],
            sky_top: [0.529, 0.808, 0.922, 1.0],
            sky_bottom: [0.118, 0.565, 1.0, 1.0],
            line_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl SceneUniforms {
    /// Fill the camera-dependent fields for the given surface aspect ratio
    pub fn with_camera(mut self, camera: &Camera, projection: &Projection, aspect: f32) -> Self {
        let proj = projection.matrix(aspect);
        self.view_proj = (proj * camera.view_matrix()).to_cols_array_2d();
        self.sky_view_proj = (proj * camera.rotation_view_matrix()).to_cols_array_2d();
        self.camera_pos = camera.position.extend(1.0).to_array();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_vertex_size() {
        // 3 floats position + 3 floats normal = 24 bytes
        assert_eq!(size_of::<Vertex>(), 24);
        assert_eq!(Vertex::layout().array_stride, 24);
    }

    #[test]
    fn test_instance_size() {
        // 16 floats matrix + 4 floats color = 80 bytes
        assert_eq!(size_of::<InstanceRaw>(), 80);
    }

    #[test]
    fn test_scene_uniforms_size() {
        // 2 matrices (128) + 6 vec4 (96) = 224 bytes, a multiple of 16
        assert_eq!(size_of::<SceneUniforms>(), 224);
        assert_eq!(size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn test_sky_matrix_ignores_camera_position() {
        let projection = Projection::default();
        let mut near = Camera::default();
        near.position = Vec3::ZERO;
        let far = Camera::default();
        let a = SceneUniforms::default().with_camera(&near, &projection, 1.5);
        let b = SceneUniforms::default().with_camera(&far, &projection, 1.5);
        let (sky_a, sky_b) = (a.sky_view_proj.as_flattened(), b.sky_view_proj.as_flattened());
        for (x, y) in sky_a.iter().zip(sky_b) {
            assert!((x - y).abs() < 1e-5, "{} != {}", x, y);
        }
        assert_ne!(a.view_proj, b.view_proj);
        assert_eq!(b.camera_pos[..3], far.position.to_array());
    }

    #[test]
    fn test_instance_from_identity_transform() {
        let instance = InstanceRaw::from_transform(&ObjectTransform::default(), [0.1, 0.2, 0.3]);
        assert_eq!(instance.model, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(instance.color, [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_instance_translation_in_last_column() {
        let transform = ObjectTransform {
            translation: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        };
        let instance = InstanceRaw::from_transform(&transform, [1.0; 3]);
        assert_eq!(instance.model[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
