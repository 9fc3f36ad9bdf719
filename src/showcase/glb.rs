// GLB parsing into a `ModelRig`, animation clips and CPU-side meshes.
//
// Only triangle primitives with positions are kept. Materials contribute
// their base colour factor; textures, skins and morph targets are ignored.

use glam::{Quat, Vec3};
use studio_core::{AnimationClip, Aabb, Channel, ChannelValues, Interpolation, LoadError, ModelRig, NodeTransform, RigNode};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct PrimitiveData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

impl PrimitiveData {
    /// Line-list indices tracing every triangle edge, for wireframe mode.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for tri in self.indices.chunks_exact(3) {
            lines.extend_from_slice(&[tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]]);
        }
        lines
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub primitives: Vec<PrimitiveData>,
}

#[derive(Debug)]
pub struct ParsedModel {
    pub rig: ModelRig,
    pub clips: Vec<AnimationClip>,
    pub meshes: Vec<MeshData>,
}

pub fn parse_glb(bytes: &[u8], path: &str) -> Result<ParsedModel, LoadError> {
    let parse_err = |reason: String| LoadError::Parse {
        path: path.to_string(),
        reason,
    };
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| parse_err(e.to_string()))?;
    let document = gltf.document;
    let blob = gltf.blob.unwrap_or_default();
    let buffer_data = |buffer: gltf::Buffer| match buffer.source() {
        gltf::buffer::Source::Bin => Some(blob.as_slice()),
        gltf::buffer::Source::Uri(_) => None,
    };

    let mut meshes = Vec::with_capacity(document.meshes().len());
    let mut mesh_bounds = Vec::with_capacity(document.meshes().len());
    for mesh in document.meshes() {
        let mut data = MeshData::default();
        let mut bounds = Aabb::EMPTY;
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = primitive.reader(buffer_data);
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            if positions.is_empty() {
                continue;
            }
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|i| i.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());
            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|n| n.collect())
                .filter(|n: &Vec<[f32; 3]>| n.len() == positions.len())
                .unwrap_or_else(|| smooth_normals(&positions, &indices));
            bounds = positions
                .iter()
                .fold(bounds, |b, p| b.with_point(Vec3::from(*p)));
            let vertices = positions
                .iter()
                .zip(&normals)
                .map(|(p, n)| ModelVertex {
                    position: *p,
                    normal: *n,
                })
                .collect();
            data.primitives.push(PrimitiveData {
                vertices,
                indices,
                base_color: primitive
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor(),
            });
        }
        meshes.push(data);
        mesh_bounds.push(bounds);
    }

    let rig = build_rig(&document, mesh_bounds);
    if rig.mesh_instance_count() == 0 {
        return Err(LoadError::Empty {
            path: path.to_string(),
        });
    }
    let clips = document
        .animations()
        .map(|anim| read_clip(&anim, &buffer_data))
        .filter(|clip| !clip.channels.is_empty())
        .collect();

    Ok(ParsedModel { rig, clips, meshes })
}

/// Flatten the node graph into parent-linked rig nodes. Node indices are kept
/// so animation channels can address them directly.
fn build_rig(document: &gltf::Document, mesh_bounds: Vec<Aabb>) -> ModelRig {
    let mut nodes: Vec<RigNode> = document
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            RigNode {
                name: node.name().map(str::to_string),
                parent: None,
                rest: NodeTransform {
                    translation: Vec3::from(t),
                    rotation: Quat::from_array(r),
                    scale: Vec3::from(s),
                },
                mesh: node
                    .mesh()
                    .map(|m| m.index())
                    .filter(|&i| mesh_bounds.get(i).is_some_and(|b| !b.is_empty())),
            }
        })
        .collect();
    for node in document.nodes() {
        for child in node.children() {
            if let Some(slot) = nodes.get_mut(child.index()) {
                slot.parent = Some(node.index());
            }
        }
    }
    // Nodes outside the default scene are not drawn.
    if let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) {
        let mut in_scene = vec![false; nodes.len()];
        let mut stack: Vec<gltf::Node> = scene.nodes().collect();
        while let Some(node) = stack.pop() {
            in_scene[node.index()] = true;
            stack.extend(node.children());
        }
        for (node, keep) in nodes.iter_mut().zip(in_scene) {
            if !keep {
                node.mesh = None;
            }
        }
    }
    ModelRig { nodes, mesh_bounds }
}

fn read_clip<'a, 's, F>(anim: &gltf::Animation<'a>, buffer_data: &F) -> AnimationClip
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    let mut channels = Vec::new();
    for channel in anim.channels() {
        let reader = channel.reader(buffer_data.clone());
        let Some(times) = reader.read_inputs().map(|t| t.collect::<Vec<f32>>()) else {
            continue;
        };
        let Some(outputs) = reader.read_outputs() else {
            continue;
        };
        let sampler_mode = channel.sampler().interpolation();
        let values = match outputs {
            gltf::animation::util::ReadOutputs::Translations(v) => ChannelValues::Translation(v.map(Vec3::from).collect()),
            gltf::animation::util::ReadOutputs::Rotations(v) => {
                ChannelValues::Rotation(v.into_f32().map(Quat::from_array).collect())
            }
            gltf::animation::util::ReadOutputs::Scales(v) => ChannelValues::Scale(v.map(Vec3::from).collect()),
            gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => continue,
        };
        let (values, interpolation) = match sampler_mode {
            gltf::animation::Interpolation::Linear => (values, Interpolation::Linear),
            gltf::animation::Interpolation::Step => (values, Interpolation::Step),
            // (in-tangent, value, out-tangent) triplets: keep the values
            gltf::animation::Interpolation::CubicSpline => (cubic_values(values), Interpolation::Linear),
        };
        channels.push(Channel {
            node: channel.target().node().index(),
            times,
            values,
            interpolation,
        });
    }
    AnimationClip::new(anim.name().unwrap_or("clip"), channels)
}

fn cubic_values(values: ChannelValues) -> ChannelValues {
    fn middle<T: Copy>(v: Vec<T>) -> Vec<T> {
        v.chunks_exact(3).map(|c| c[1]).collect()
    }
    match values {
        ChannelValues::Translation(v) => ChannelValues::Translation(middle(v)),
        ChannelValues::Rotation(v) => ChannelValues::Rotation(middle(v)),
        ChannelValues::Scale(v) => ChannelValues::Scale(middle(v)),
    }
}

/// Area-weighted vertex normals for meshes that ship without them.
pub fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (Vec3::from(positions[a]), Vec3::from(positions[b]), Vec3::from(positions[c]));
        let n = (pb - pa).cross(pc - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}
