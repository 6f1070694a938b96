//! Procedural meshes for every shape kind
//!
//! All meshes are unit-sized and centred on the origin so that a rigid-body
//! pose can be used directly as the model matrix:
//! cube edge 1, sphere radius 0.5, cone and cylinder height 1.

use std::f32::consts::{PI, TAU};

use wgpu::util::DeviceExt;

use crate::pipeline::types::Vertex;

/// Default tessellation for the sphere (latitudes x longitudes)
pub const SPHERE_DETAIL: (u32, u32) = (32, 32);
/// Default segment count for cones and cylinders
pub const ROUND_SEGMENTS: u32 = 32;

const CONE_RADIUS: f32 = 0.4;
const CYLINDER_RADIUS: f32 = 0.5;
const HALF: f32 = 0.5;

/// Interleaved vertices plus triangle indices, still on the CPU
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Unit cube with one quad of face-normal vertices per side
    pub fn cube() -> Self {
        // (normal, u, v) with u x v == normal, so each quad winds outward
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let mut mesh = MeshData::default();
        for (normal, u, v) in FACES {
            let base = mesh.vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = std::array::from_fn(|i| {
                    (normal[i] + su * u[i] + sv * v[i]) * HALF
                });
                mesh.vertices.push(Vertex::new(position, normal));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// UV sphere of radius 0.5
    pub fn sphere(latitudes: u32, longitudes: u32) -> Self {
        let latitudes = latitudes.max(2);
        let longitudes = longitudes.max(3);
        let mut mesh = MeshData::default();

        for i in 0..=latitudes {
            let theta = i as f32 * PI / latitudes as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            for j in 0..=longitudes {
                let phi = j as f32 * TAU / longitudes as f32;
                let (sin_p, cos_p) = phi.sin_cos();
                let normal = [sin_t * cos_p, cos_t, sin_t * sin_p];
                let position = normal.map(|c| c * HALF);
                mesh.vertices.push(Vertex::new(position, normal));
            }
        }

        let stride = longitudes + 1;
        for i in 0..latitudes {
            for j in 0..longitudes {
                let a = i * stride + j;
                let b = a + stride;
                mesh.indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }
        mesh
    }

    /// Cone with its apex at y = 0.5 and a capped base at y = -0.5
    pub fn cone(segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = MeshData::default();
        // Side normal of a cone of height 1: (cos, r, sin) before normalisation
        let slant = |phi: f32| normalize([phi.cos(), CONE_RADIUS, phi.sin()]);

        // Base ring for the side
        for i in 0..=segments {
            let phi = segment_angle(i, segments);
            mesh.vertices
                .push(Vertex::new(ring_point(phi, CONE_RADIUS, -HALF), slant(phi)));
        }
        // One apex per segment so each face gets its own mid-angle normal
        let apex_start = mesh.vertices.len() as u32;
        for i in 0..segments {
            let phi = segment_angle(i, segments) + PI / segments as f32;
            mesh.vertices.push(Vertex::new([0.0, HALF, 0.0], slant(phi)));
        }
        for i in 0..segments {
            mesh.indices.extend_from_slice(&[i, apex_start + i, i + 1]);
        }

        push_cap(&mut mesh, segments, CONE_RADIUS, -HALF);
        mesh
    }

    /// Cylinder of radius 0.5 and height 1 with both ends capped
    pub fn cylinder(segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = MeshData::default();

        for y in [-HALF, HALF] {
            for i in 0..=segments {
                let phi = segment_angle(i, segments);
                let normal = [phi.cos(), 0.0, phi.sin()];
                mesh.vertices
                    .push(Vertex::new(ring_point(phi, CYLINDER_RADIUS, y), normal));
            }
        }
        let top = segments + 1;
        for i in 0..segments {
            let (b0, b1, t0, t1) = (i, i + 1, top + i, top + i + 1);
            mesh.indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
        }

        push_cap(&mut mesh, segments, CYLINDER_RADIUS, HALF);
        push_cap(&mut mesh, segments, CYLINDER_RADIUS, -HALF);
        mesh
    }

    /// Edges of a unit cube for line-list drawing
    pub fn wire_box() -> Self {
        let vertices = (0..8u32)
            .map(|corner| {
                let axis = |bit: u32| if corner & bit == 0 { -HALF } else { HALF };
                Vertex::new([axis(1), axis(2), axis(4)], [0.0, 1.0, 0.0])
            })
            .collect();
        // Pairs of corners differing in exactly one bit
        let mut indices = Vec::with_capacity(24);
        for corner in 0..8u32 {
            for bit in [1, 2, 4] {
                if corner & bit == 0 {
                    indices.extend_from_slice(&[corner, corner | bit]);
                }
            }
        }
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Non-indexed triangle positions of the cube spanning [-1, 1]
pub fn skybox_positions() -> Vec<[f32; 3]> {
    let cube = MeshData::cube();
    cube.indices
        .iter()
        .map(|&i| cube.vertices[i as usize].position.map(|c| c * 2.0))
        .collect()
}

fn segment_angle(i: u32, segments: u32) -> f32 {
    i as f32 * TAU / segments as f32
}

fn ring_point(phi: f32, radius: f32, y: f32) -> [f32; 3] {
    [radius * phi.cos(), y, radius * phi.sin()]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        v.map(|c| c / len)
    } else {
        v
    }
}

/// Flat disc at height `y`, facing away from the origin
fn push_cap(mesh: &mut MeshData, segments: u32, radius: f32, y: f32) {
    let normal = [0.0, y.signum(), 0.0];
    let center = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex::new([0.0, y, 0.0], normal));
    for i in 0..=segments {
        let phi = segment_angle(i, segments);
        mesh.vertices.push(Vertex::new(ring_point(phi, radius, y), normal));
    }
    for i in 0..segments {
        let (a, b) = (center + 1 + i, center + 2 + i);
        if y > 0.0 {
            mesh.indices.extend_from_slice(&[center, b, a]);
        } else {
            mesh.indices.extend_from_slice(&[center, a, b]);
        }
    }
}

/// Immutable GPU copy of a mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_well_formed(mesh: &MeshData) {
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count), "index out of bounds");
        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.normal;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - 1.0).abs() < EPSILON, "normal not unit: {:?}", vertex.normal);
        }
    }

    fn extent(mesh: &MeshData) -> f32 {
        mesh.vertices
            .iter()
            .flat_map(|v| v.position)
            .fold(0.0f32, |acc, c| acc.max(c.abs()))
    }

    #[test]
    fn test_cube_counts() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
        assert_well_formed(&cube);
        assert!((extent(&cube) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let cube = MeshData::cube();
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| cube.vertices[tri[k] as usize].position);
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let cross = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let n = cube.vertices[tri[0] as usize].normal;
            let dot = cross[0] * n[0] + cross[1] * n[1] + cross[2] * n[2];
            assert!(dot > 0.0);
        }
    }

    #[test]
    fn test_sphere_counts() {
        let sphere = MeshData::sphere(32, 32);
        assert_eq!(sphere.vertex_count(), 33 * 33);
        assert_eq!(sphere.index_count(), 6 * 32 * 32);
        assert_well_formed(&sphere);
        assert!((extent(&sphere) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_sphere_normals_follow_position() {
        let sphere = MeshData::sphere(8, 12);
        for vertex in &sphere.vertices {
            for k in 0..3 {
                assert!((vertex.position[k] - vertex.normal[k] * 0.5).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_cone_counts() {
        let cone = MeshData::cone(32);
        assert_eq!(cone.vertex_count(), 3 * 32 + 3);
        assert_eq!(cone.index_count(), 6 * 32);
        assert_well_formed(&cone);
    }

    #[test]
    fn test_cone_apex_and_base() {
        let cone = MeshData::cone(16);
        let max_y = cone.vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        let min_y = cone.vertices.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        assert_eq!(max_y, 0.5);
        assert_eq!(min_y, -0.5);
        assert!((extent(&cone) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_cylinder_counts() {
        let cylinder = MeshData::cylinder(32);
        assert_eq!(cylinder.vertex_count(), 4 * 32 + 6);
        assert_eq!(cylinder.index_count(), 12 * 32);
        assert_well_formed(&cylinder);
    }

    #[test]
    fn test_low_segment_counts_are_raised() {
        assert_eq!(MeshData::cone(1).index_count(), 6 * 3);
        assert_eq!(MeshData::sphere(0, 0).index_count(), 6 * 2 * 3);
    }

    #[test]
    fn test_wire_box() {
        let wire = MeshData::wire_box();
        assert_eq!(wire.vertex_count(), 8);
        assert_eq!(wire.index_count(), 24);
        assert_well_formed(&wire);
        // Every edge joins corners that differ along exactly one axis
        for edge in wire.indices.chunks(2) {
            let a = wire.vertices[edge[0] as usize].position;
            let b = wire.vertices[edge[1] as usize].position;
            let differing = (0..3).filter(|&k| a[k] != b[k]).count();
            assert_eq!(differing, 1);
        }
    }

    #[test]
    fn test_skybox_positions() {
        let positions = skybox_positions();
        assert_eq!(positions.len(), 36);
        assert!(positions.iter().flatten().all(|c| c.abs() == 1.0));
    }
}
