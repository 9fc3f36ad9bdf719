//! Node hierarchy of a loaded model, independent of any GPU resources.

use crate::bounds::Aabb;
use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl NodeTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RigNode {
    pub name: Option<String>,
    pub parent: Option<usize>,
    pub rest: NodeTransform,
    /// Index into [`ModelRig::mesh_bounds`] (and the renderer's mesh list).
    pub mesh: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct ModelRig {
    pub nodes: Vec<RigNode>,
    pub mesh_bounds: Vec<Aabb>,
}

impl ModelRig {
    pub fn rest_pose(&self) -> Vec<NodeTransform> {
        self.nodes.iter().map(|n| n.rest).collect()
    }

    /// World matrix of every node for the given local pose.
    pub fn world_matrices(&self, pose: &[NodeTransform]) -> Vec<Mat4> {
        let mut cache: Vec<Option<Mat4>> = vec![None; self.nodes.len()];
        for i in 0..self.nodes.len() {
            self.resolve(i, pose, &mut cache, 0);
        }
        cache.into_iter().map(|m| m.unwrap_or(Mat4::IDENTITY)).collect()
    }

    fn resolve(&self, i: usize, pose: &[NodeTransform], cache: &mut [Option<Mat4>], depth: usize) -> Mat4 {
        if let Some(m) = cache[i] {
            return m;
        }
        let local = pose.get(i).unwrap_or(&self.nodes[i].rest).matrix();
        // A malformed file could loop parent links; cut it off at tree depth.
        let world = match self.nodes[i].parent {
            Some(p) if p < self.nodes.len() && depth < self.nodes.len() => {
                self.resolve(p, pose, cache, depth + 1) * local
            }
            _ => local,
        };
        cache[i] = Some(world);
        world
    }

    /// Model-space bounds of every mesh instance under `pose`.
    pub fn bounds(&self, pose: &[NodeTransform]) -> Aabb {
        let world = self.world_matrices(pose);
        self.nodes
            .iter()
            .zip(world.iter())
            .filter_map(|(node, m)| {
                node.mesh
                    .and_then(|mi| self.mesh_bounds.get(mi))
                    .map(|b| b.transformed(m))
            })
            .fold(Aabb::EMPTY, Aabb::union)
    }

    pub fn mesh_instance_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }
}
