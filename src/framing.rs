//! Auto-centering and camera placement for a freshly loaded model.

use cgmath::{Angle, Deg, EuclideanSpace, Point3, Rad, Vector3, Zero};
use log::debug;

use crate::{
    camera::CameraState,
    config::FramingConfig,
    data_structures::{
        bounds::BoundingBox,
        scene_graph::{NodeId, SceneGraph, SceneNode},
    },
};

/// Result of one framing pass. The session keeps it to restore the pose later.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramedView {
    /// World box of all meshes before centering. `None` for a model without meshes.
    pub bounds: Option<BoundingBox>,
    /// Translation applied to the model group.
    pub offset: Vector3<f32>,
    pub model_group: Option<NodeId>,
    pub distance: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl FramedView {
    /// Puts `camera` back into the framed pose.
    pub fn apply_to(&self, camera: &mut CameraState) {
        camera.position = self.position;
        camera.look_at(self.target);
        camera.update_projection_matrix();
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameComposer {
    pub config: FramingConfig,
}

impl FrameComposer {
    pub fn new(config: FramingConfig) -> Self {
        Self { config }
    }

    /// Moves the model group so the mesh bounds are centered at the origin and
    /// places `camera` so the whole box fits its vertical field of view.
    ///
    /// A second call on the same scene finds the box already centered: nothing
    /// moves and the pose is the same.
    pub fn compose(&self, scene: &mut SceneGraph, camera: &mut CameraState) -> FramedView {
        let bounds = world_bounds(scene);
        let center = bounds.map(|b| b.center()).unwrap_or_else(Point3::origin);
        let max_dim = bounds.map(|b| b.max_dimension()).unwrap_or(0.0);

        let model_group = find_model_group(scene.root()).map(SceneNode::id);
        let mut offset = Vector3::zero();
        match model_group.and_then(|id| scene.get_mut(id)) {
            Some(group) => {
                offset = -center.to_vec();
                group.transform.translation += offset;
                debug!("Moved model group {} by {:?}.", group.name, offset);
            }
            None => debug!("No model group found; the model stays in place."),
        }

        let distance = camera_distance(max_dim, camera.fov_y, &self.config);
        let position = Point3::from_vec(self.config.direction_weights * distance);
        let target = Point3::origin();
        camera.position = position;
        camera.look_at(target);
        camera.update_projection_matrix();

        FramedView {
            bounds,
            offset,
            model_group,
            distance,
            position,
            target,
        }
    }
}

/// Union of the world-space boxes of every mesh in `scene`.
pub fn world_bounds(scene: &SceneGraph) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    scene.traverse_with_world(&mut |node, world| {
        let Some(local) = node.as_mesh().and_then(|mesh| mesh.geometry.bounding()) else {
            return;
        };
        let extent = local.transform(world);
        bounds = Some(match bounds {
            Some(acc) => acc.merge(&extent),
            None => extent,
        });
    });
    bounds
}

/// The imported model's container: the first group in depth-first pre-order
/// that is not `root` and has at least one child.
pub fn find_model_group(root: &SceneNode) -> Option<&SceneNode> {
    let root_id = root.id();
    root.find_first(&|node: &SceneNode| {
        node.id() != root_id && node.is_group() && !node.children().is_empty()
    })
}

/// Distance along the view direction at which a box of extent `max_dim`
/// fills the vertical field of view, times the configured margin. Degenerate
/// results fall back to the configured distance.
pub fn camera_distance(max_dim: f32, fov_y: Deg<f32>, config: &FramingConfig) -> f32 {
    let half_fov = Rad::from(fov_y) / 2.0;
    let distance = (max_dim / 2.0 / half_fov.tan()).abs() * config.margin;
    if distance.is_finite() && distance > 0.0 {
        distance
    } else {
        config.fallback_distance
    }
}
