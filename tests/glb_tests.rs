// Host-side tests for GLB parsing.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod glb {
    include!("../src/showcase/glb.rs");
}

use glam::Vec3;
use glb::*;
use studio_core::{ChannelValues, Interpolation, LoadError};

/// Pack a JSON document and binary payload into a GLB container.
fn pack_glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json.len() + if bin.is_empty() { 0 } else { 8 + bin.len() };
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
    }
    out
}

fn push_f32s(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

/// One triangle under a parent node, animated by a translation channel.
fn triangle_glb(mode: u32, interpolation: &str) -> Vec<u8> {
    let mut bin = Vec::new();
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 4.0, 0.0]);
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    let times_offset = bin.len();
    push_f32s(&mut bin, &[0.0, 1.0]);
    let outputs_offset = bin.len();
    let (output_count, outputs): (usize, Vec<f32>) = if interpolation == "CUBICSPLINE" {
        (
            6,
            vec![
                9.0, 9.0, 9.0, 1.0, 0.0, 0.0, 9.0, 9.0, 9.0, //
                9.0, 9.0, 9.0, 1.0, 2.0, 0.0, 9.0, 9.0, 9.0,
            ],
        )
    } else {
        (2, vec![1.0, 0.0, 0.0, 1.0, 2.0, 0.0])
    };
    push_f32s(&mut bin, &outputs);
    let json = format!(
        r#"{{
  "asset": {{"version": "2.0"}},
  "scene": 0,
  "scenes": [{{"nodes": [0]}}],
  "nodes": [
    {{"name": "root", "children": [1]}},
    {{"name": "part", "mesh": 0, "translation": [1.0, 0.0, 0.0]}}
  ],
  "meshes": [{{"primitives": [{{"attributes": {{"POSITION": 0}}, "indices": 1, "material": 0, "mode": {mode}}}]}}],
  "materials": [{{"pbrMetallicRoughness": {{"baseColorFactor": [0.5, 0.25, 1.0, 1.0]}}}}],
  "animations": [{{
    "name": "slide",
    "channels": [{{"sampler": 0, "target": {{"node": 1, "path": "translation"}}}}],
    "samplers": [{{"input": 2, "output": 3, "interpolation": "{interpolation}"}}]
  }}],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [2.0, 4.0, 0.0]}},
    {{"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}},
    {{"bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0]}},
    {{"bufferView": 3, "componentType": 5126, "count": {output_count}, "type": "VEC3"}}
  ],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 36, "byteLength": 6}},
    {{"buffer": 0, "byteOffset": {times_offset}, "byteLength": 8}},
    {{"buffer": 0, "byteOffset": {outputs_offset}, "byteLength": {outputs_len}}}
  ],
  "buffers": [{{"byteLength": {buffer_len}}}]
}}"#,
        outputs_len = outputs.len() * 4,
        buffer_len = bin.len(),
    );
    pack_glb(&json, &bin)
}

const PATH: &str = "models/triangle.glb";

#[test]
fn parses_hierarchy_and_rest_transforms() {
    let parsed = parse_glb(&triangle_glb(4, "LINEAR"), PATH).unwrap();
    let rig = &parsed.rig;
    assert_eq!(rig.nodes.len(), 2);
    assert_eq!(rig.nodes[0].name.as_deref(), Some("root"));
    assert_eq!(rig.nodes[0].parent, None);
    assert_eq!(rig.nodes[0].mesh, None);
    assert_eq!(rig.nodes[1].parent, Some(0));
    assert_eq!(rig.nodes[1].mesh, Some(0));
    assert_eq!(rig.nodes[1].rest.translation, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(rig.mesh_instance_count(), 1);
}

#[test]
fn mesh_bounds_follow_positions() {
    let parsed = parse_glb(&triangle_glb(4, "LINEAR"), PATH).unwrap();
    let bounds = parsed.rig.mesh_bounds[0];
    assert_eq!(bounds.min, Vec3::ZERO);
    assert_eq!(bounds.max, Vec3::new(2.0, 4.0, 0.0));
    // rest pose offsets the mesh by the node translation
    let placed = parsed.rig.bounds(&parsed.rig.rest_pose());
    assert_eq!(placed.min, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(placed.max, Vec3::new(3.0, 4.0, 0.0));
}

#[test]
fn primitive_keeps_indices_colour_and_generated_normals() {
    let parsed = parse_glb(&triangle_glb(4, "LINEAR"), PATH).unwrap();
    assert_eq!(parsed.meshes.len(), 1);
    let prim = &parsed.meshes[0].primitives[0];
    assert_eq!(prim.indices, vec![0, 1, 2]);
    assert_eq!(prim.base_color, [0.5, 0.25, 1.0, 1.0]);
    assert_eq!(prim.vertices.len(), 3);
    for v in &prim.vertices {
        assert_eq!(v.normal, [0.0, 0.0, 1.0]);
    }
    assert_eq!(prim.vertices[2].position, [0.0, 4.0, 0.0]);
}

#[test]
fn wireframe_edges_cover_each_triangle_side() {
    let parsed = parse_glb(&triangle_glb(4, "LINEAR"), PATH).unwrap();
    let edges = parsed.meshes[0].primitives[0].edge_indices();
    assert_eq!(edges, vec![0, 1, 1, 2, 2, 0]);
}

#[test]
fn translation_clip_is_read() {
    let parsed = parse_glb(&triangle_glb(4, "LINEAR"), PATH).unwrap();
    assert_eq!(parsed.clips.len(), 1);
    let clip = &parsed.clips[0];
    assert_eq!(clip.name, "slide");
    assert_eq!(clip.duration, 1.0);
    let channel = &clip.channels[0];
    assert_eq!(channel.node, 1);
    assert_eq!(channel.interpolation, Interpolation::Linear);
    assert_eq!(
        channel.values,
        ChannelValues::Translation(vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.0)])
    );
}

#[test]
fn step_sampler_maps_to_step() {
    let parsed = parse_glb(&triangle_glb(4, "STEP"), PATH).unwrap();
    assert_eq!(parsed.clips[0].channels[0].interpolation, Interpolation::Step);
}

#[test]
fn cubic_spline_keeps_key_values_only() {
    let parsed = parse_glb(&triangle_glb(4, "CUBICSPLINE"), PATH).unwrap();
    let channel = &parsed.clips[0].channels[0];
    assert_eq!(channel.interpolation, Interpolation::Linear);
    assert_eq!(
        channel.values,
        ChannelValues::Translation(vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.0)])
    );
}

#[test]
fn point_primitives_leave_nothing_to_draw() {
    // mode 0 = POINTS
    let err = parse_glb(&triangle_glb(0, "LINEAR"), PATH).unwrap_err();
    assert_eq!(err, LoadError::Empty { path: PATH.to_string() });
}

#[test]
fn file_without_meshes_is_empty() {
    let json = r#"{"asset": {"version": "2.0"}, "scenes": [{"nodes": [0]}], "nodes": [{"name": "lonely"}]}"#;
    let err = parse_glb(&pack_glb(json, &[]), PATH).unwrap_err();
    assert!(matches!(err, LoadError::Empty { .. }));
}

#[test]
fn garbage_is_a_parse_error() {
    let err = parse_glb(b"definitely not a model", PATH).unwrap_err();
    match err {
        LoadError::Parse { path, reason } => {
            assert_eq!(path, PATH);
            assert!(!reason.is_empty());
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn smooth_normals_skip_out_of_range_indices() {
    let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let normals = smooth_normals(&positions, &[0, 1, 2, 0, 1, 9]);
    assert_eq!(normals, vec![[0.0, 0.0, 1.0]; 3]);
    // vertices no triangle touches fall back to +Y
    let lonely = smooth_normals(&positions, &[]);
    assert_eq!(lonely, vec![[0.0, 1.0, 0.0]; 3]);
}
