use glam::{Mat4, Vec3};
use umbra_assets::SceneData;

use crate::bounds::Aabb;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneDraw {
    pub mesh: usize,
    pub primitive: usize,
    pub material: Option<usize>,
    pub world: Mat4,
}

/// The node hierarchy of a [`SceneData`] flattened into draw items, plus the
/// scene bounds those draws cover.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    draws: Vec<SceneDraw>,
    aabb: Aabb,
}

impl SceneGraph {
    pub fn from_scene_data(scene: &SceneData) -> Self {
        let mut draws = Vec::new();
        let mut aabb = Aabb::EMPTY;
        let mut visited = vec![false; scene.nodes.len()];
        let mut stack: Vec<(usize, Mat4)> = scene
            .roots
            .iter()
            .rev()
            .map(|&root| (root, Mat4::IDENTITY))
            .collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(node) = scene.nodes.get(index) else {
                log::warn!("node index {index} out of range, skipped");
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                log::warn!("node '{}' reached twice, skipped", node.name);
                continue;
            }

            let world = parent * node.transform.compute_matrix();

            if let Some(mesh_index) = node.mesh_index {
                match scene.meshes.get(mesh_index) {
                    Some(mesh) => {
                        for (primitive_index, primitive) in mesh.primitives.iter().enumerate() {
                            aabb = aabb.union(&Aabb::from_points(
                                primitive
                                    .vertices
                                    .iter()
                                    .map(|v| world.transform_point3(Vec3::from(v.position))),
                            ));
                            draws.push(SceneDraw {
                                mesh: mesh_index,
                                primitive: primitive_index,
                                material: primitive.material_index,
                                world,
                            });
                        }
                    }
                    None => log::warn!("node '{}' references missing mesh {mesh_index}", node.name),
                }
            }

            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }

        Self { draws, aabb }
    }

    pub fn draws(&self) -> &[SceneDraw] {
        &self.draws
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn normalization_transform(&self) -> Mat4 {
        self.aabb.normalization_transform()
    }
}

#[cfg(test)]
mod tests {
    use umbra_assets::{MeshData, PrimitiveData, SceneNode, Vertex};
    use umbra_core::Transform;

    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 0.0],
        }
    }

    fn node(transform: Transform, mesh_index: Option<usize>, children: Vec<usize>) -> SceneNode {
        SceneNode {
            name: "node".into(),
            transform,
            mesh_index,
            children,
        }
    }

    fn two_level_scene() -> SceneData {
        SceneData {
            meshes: vec![MeshData {
                name: "tri".into(),
                primitives: vec![PrimitiveData {
                    vertices: vec![vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(0.0, 1.0, 0.0)],
                    indices: vec![0, 1, 2],
                    material_index: Some(0),
                }],
            }],
            nodes: vec![
                node(Transform::from_xyz(10.0, 0.0, 0.0), Some(0), vec![1]),
                node(Transform::from_xyz(0.0, 5.0, 0.0), Some(0), vec![]),
            ],
            roots: vec![0],
            ..Default::default()
        }
    }

    #[test]
    fn children_inherit_parent_transforms() {
        let graph = SceneGraph::from_scene_data(&two_level_scene());

        assert_eq!(graph.draws().len(), 2);
        let child = graph.draws()[1];
        let origin = child.world.transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(child.material, Some(0));
    }

    #[test]
    fn bounds_cover_every_placed_vertex() {
        let graph = SceneGraph::from_scene_data(&two_level_scene());
        assert_eq!(graph.aabb().min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(graph.aabb().max, Vec3::new(11.0, 6.0, 0.0));

        let normalized = graph
            .normalization_transform()
            .transform_point3(graph.aabb().max);
        assert!(normalized.abs_diff_eq(Vec3::new(1.0 / 12.0, 0.5, 0.0), 1e-6));
    }

    #[test]
    fn broken_references_and_cycles_are_skipped() {
        let mut scene = two_level_scene();
        scene.nodes[1].children = vec![0, 7];
        scene.nodes.push(node(Transform::default(), Some(3), vec![]));
        scene.roots.push(2);

        let graph = SceneGraph::from_scene_data(&scene);
        assert_eq!(graph.draws().len(), 2);
    }
}
