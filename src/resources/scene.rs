//! Conversion of parsed glTF documents into scene nodes.

use log::{debug, warn};

use crate::{
    data_structures::{
        geometry::Geometry,
        light::Light,
        scene_graph::{CameraProjection, SceneNode},
        transform::Transform,
    },
    error::LoadFailure,
};

/// Builds the model container for the document's default scene (or its first
/// scene). The container is a group named `name` holding the scene's root nodes.
pub fn to_model_node(
    document: &gltf::Document,
    buffers: &[Vec<u8>],
    name: &str,
) -> Result<SceneNode, LoadFailure> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| LoadFailure::MissingScene(name.to_string()))?;

    let mut model = SceneNode::group(name);
    for node in scene.nodes() {
        model.add_child(to_scene_node(node, buffers));
    }
    debug!(
        "Scene {} of {} converted into {} nodes.",
        scene.index(),
        name,
        model.len()
    );
    Ok(model)
}

/// A glTF node with exactly one attachment (a single mesh primitive, a camera
/// or a light) becomes a node of that kind. Nodes with several attachments
/// become a group with one child per attachment, nodes without any become a
/// plain group. Children follow in document order.
pub fn to_scene_node(node: gltf::Node, buffers: &[Vec<u8>]) -> SceneNode {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut attachments = Vec::new();
    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
        for primitive in mesh.primitives() {
            let geometry = read_geometry(&primitive, buffers);
            attachments.push(SceneNode::mesh(
                format!("{}_{}", mesh_name, primitive.index()),
                geometry,
            ));
        }
    }
    if let Some(camera) = node.camera() {
        attachments.push(SceneNode::camera(
            camera.name().unwrap_or("camera"),
            CameraProjection::from(camera.projection()),
        ));
    }
    if let Some(light) = node.light() {
        attachments.push(SceneNode::light(
            light.name().unwrap_or("light"),
            Light::from(light),
        ));
    }

    let mut scene_node = if attachments.len() == 1 {
        let mut only = attachments.swap_remove(0);
        only.name = name;
        only
    } else {
        let mut group = SceneNode::group(name);
        for attachment in attachments {
            group.add_child(attachment);
        }
        group
    };
    scene_node.transform = Transform::from(node.transform());

    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buffers));
    }
    scene_node
}

fn read_geometry(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Geometry {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let positions = match reader.read_positions() {
        Some(positions) => positions.collect(),
        None => {
            warn!(
                "Primitive {} has no readable positions.",
                primitive.index()
            );
            Vec::new()
        }
    };
    let indices = reader
        .read_indices()
        .map(|indices| indices.into_u32().collect());

    Geometry::new(positions, indices)
}
