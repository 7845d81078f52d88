use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3], // Flat lists are easier for generic loaders
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// A triangle list sharing one material.
#[derive(Clone, Debug)]
pub struct PrimitiveData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Index into `SceneData::materials`, `None` for the default material
    pub material_index: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct MeshData {
    pub name: String,
    pub primitives: Vec<PrimitiveData>,
}

/// Area-weighted vertex normals for meshes that ship without them.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let face = (pb - pa).cross(pc - pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}
