//! The viewer's own lighting: one ambient and one directional light.

use cgmath::Vector3;

use crate::data_structures::{
    light::{Color, Light, LightKind},
    scene_graph::{NodeId, SceneGraph, SceneNode},
    transform::Transform,
};

pub const AMBIENT_INTENSITY: f32 = 0.5;
pub const DIRECTIONAL_INTENSITY: f32 = 1.0;
pub const DIRECTIONAL_POSITION: Vector3<f32> = Vector3 {
    x: 5.0,
    y: 10.0,
    z: 7.5,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RigLight {
    Ambient,
    Directional,
}

/// Node ids of the two viewer lights. Both live directly below the scene root
/// and survive model swaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightRig {
    pub ambient: NodeId,
    pub directional: NodeId,
}

impl LightRig {
    pub fn install(scene: &mut SceneGraph) -> Self {
        let ambient = scene.add_to_root(SceneNode::light(
            "AmbientLight",
            Light::new(LightKind::Ambient, Color::WHITE, AMBIENT_INTENSITY),
        ));
        let directional = scene.add_to_root(
            SceneNode::light(
                "DirectionalLight",
                Light::new(LightKind::Directional, Color::WHITE, DIRECTIONAL_INTENSITY),
            )
            .with_transform(Transform::from_translation(DIRECTIONAL_POSITION)),
        );
        Self {
            ambient,
            directional,
        }
    }

    fn id(&self, which: RigLight) -> NodeId {
        match which {
            RigLight::Ambient => self.ambient,
            RigLight::Directional => self.directional,
        }
    }

    pub fn light<'a>(&self, scene: &'a SceneGraph, which: RigLight) -> Option<&'a Light> {
        scene.get(self.id(which)).and_then(SceneNode::as_light)
    }

    pub fn light_mut<'a>(
        &self,
        scene: &'a mut SceneGraph,
        which: RigLight,
    ) -> Option<&'a mut Light> {
        scene.get_mut(self.id(which)).and_then(SceneNode::as_light_mut)
    }

    pub fn directional_position(&self, scene: &SceneGraph) -> Option<Vector3<f32>> {
        scene
            .get(self.directional)
            .map(|node| node.transform.translation)
    }

    pub fn directional_position_mut<'a>(
        &self,
        scene: &'a mut SceneGraph,
    ) -> Option<&'a mut Vector3<f32>> {
        scene
            .get_mut(self.directional)
            .map(|node| &mut node.transform.translation)
    }
}
