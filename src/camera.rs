//! Camera state and camera resolution.
//!
//! The viewer drives exactly one [`CameraState`] per session. After a load the
//! camera is resolved from the model: the first camera node in traversal order
//! wins, and a default camera is synthesized when the model ships none.

use cgmath::{Deg, EuclideanSpace, Matrix4, Point3, Rad, Vector3};
use log::{debug, warn};

use crate::{
    config::{DefaultCameraConfig, Viewport},
    data_structures::{
        scene_graph::{CameraProjection, NodeId, SceneGraph, SceneNode},
        transform::Transform,
    },
};

/// Name of the camera node inserted when a model has no camera.
pub const DEFAULT_CAMERA_NAME: &str = "DefaultCamera";

const MIN_FOV: Deg<f32> = Deg(0.1);
const MAX_FOV: Deg<f32> = Deg(179.0);
const FALLBACK_FOV: Deg<f32> = Deg(75.0);
const MIN_NEAR: f32 = 1e-4;

/// Perspective camera looking at a target point.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    pub fov_y: Deg<f32>,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    projection: Matrix4<f32>,
}

impl CameraState {
    pub fn new(fov_y: Deg<f32>, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y,
            aspect,
            near,
            far,
            position: Point3::origin(),
            target: Point3::origin(),
            projection: Matrix4::from_scale(1.0),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn from_defaults(defaults: &DefaultCameraConfig, viewport: Viewport) -> Self {
        let mut camera = Self::new(defaults.fov_y, viewport.aspect(), defaults.near, defaults.far);
        camera.position = Point3::from_vec(defaults.offset);
        camera
    }

    /// Camera matching an authored camera node. The aspect ratio always
    /// follows the viewport so the image is never stretched.
    pub fn from_projection(
        projection: &CameraProjection,
        world: &Matrix4<f32>,
        viewport: Viewport,
        defaults: &DefaultCameraConfig,
    ) -> Self {
        let (fov_y, near, far) = match *projection {
            CameraProjection::Perspective {
                fov_y, near, far, ..
            } => (fov_y, near, far),
            CameraProjection::Orthographic { near, far, .. } => {
                warn!(
                    "Orthographic model camera is driven as a perspective camera \
                     with a {:?} field of view.",
                    defaults.fov_y
                );
                (defaults.fov_y, near, Some(far))
            }
        };
        // glTF allows a zero near plane, a perspective projection does not
        let near = if near > 0.0 && near.is_finite() {
            near
        } else {
            warn!("Model camera near plane {} replaced by {}.", near, defaults.near);
            defaults.near
        };
        // a missing far plane means infinite
        let far = far.unwrap_or_else(|| defaults.far.max(near * 2.0));
        let mut camera = Self::new(fov_y, viewport.aspect(), near, far);
        camera.position = Point3::new(world.w.x, world.w.y, world.w.z);
        camera
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Recomputes the aspect ratio for a new surface size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection_matrix();
    }

    pub fn set_fov(&mut self, fov_y: Deg<f32>) {
        self.fov_y = fov_y;
        self.update_projection_matrix();
    }

    /// Must run after every change of fov, aspect or clip planes.
    ///
    /// Values `cgmath::perspective` cannot take are pulled back into range
    /// first: fov inside (0°, 180°), a positive aspect, `0 < near < far`.
    pub fn update_projection_matrix(&mut self) {
        self.sanitize();
        self.projection =
            cgmath::perspective(Rad::from(self.fov_y), self.aspect, self.near, self.far);
    }

    fn sanitize(&mut self) {
        if !(self.fov_y.0 >= MIN_FOV.0 && self.fov_y.0 <= MAX_FOV.0) {
            let fov_y = if self.fov_y.0.is_nan() {
                FALLBACK_FOV
            } else {
                Deg(self.fov_y.0.clamp(MIN_FOV.0, MAX_FOV.0))
            };
            warn!("Field of view {:?} clamped to {:?}.", self.fov_y, fov_y);
            self.fov_y = fov_y;
        }
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            warn!("Aspect ratio {} replaced by 1.", self.aspect);
            self.aspect = 1.0;
        }
        if !(self.near >= MIN_NEAR && self.near.is_finite()) {
            warn!("Near plane {} raised to {}.", self.near, MIN_NEAR);
            self.near = MIN_NEAR;
        }
        if !(self.far > self.near * 1.001 && self.far.is_finite()) {
            let far = self.near * 2.0;
            warn!("Far plane {} pushed out to {}.", self.far, far);
            self.far = far;
        }
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

/// Where the session camera came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraSource {
    /// The first camera node of the loaded model.
    Model(NodeId),
    /// The default camera node owned by the viewer scene.
    Synthesized(NodeId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCamera {
    pub camera: CameraState,
    pub source: CameraSource,
}

/// Yields exactly one usable camera for the model rooted at `model`.
///
/// Camera nodes are collected in depth-first pre-order and the first one wins;
/// later cameras are ignored. Without any, a default camera is synthesized and
/// inserted below the scene root. At most one synthesized node is kept in the
/// scene: later resolutions reuse it.
pub fn resolve_camera(
    scene: &mut SceneGraph,
    model: NodeId,
    viewport: Viewport,
    defaults: &DefaultCameraConfig,
) -> ResolvedCamera {
    let mut cameras: Vec<(NodeId, CameraProjection, Matrix4<f32>)> = Vec::new();
    scene.traverse_subtree_with_world(model, &mut |node, world| {
        if let Some(projection) = node.as_camera() {
            cameras.push((node.id(), *projection, *world));
        }
    });

    if let Some((id, projection, world)) = cameras.first() {
        if cameras.len() > 1 {
            debug!(
                "Model has {} cameras; using the first one ({:?}).",
                cameras.len(),
                id
            );
        }
        return ResolvedCamera {
            camera: CameraState::from_projection(projection, world, viewport, defaults),
            source: CameraSource::Model(*id),
        };
    }

    let camera = CameraState::from_defaults(defaults, viewport);
    let existing = scene
        .root()
        .children()
        .iter()
        .find(|node| node.name == DEFAULT_CAMERA_NAME && node.as_camera().is_some())
        .map(SceneNode::id);
    let id = match existing {
        Some(id) => {
            if let Some(node) = scene.get_mut(id) {
                node.transform = Transform::from_translation(defaults.offset);
            }
            id
        }
        None => {
            debug!("Model has no camera; synthesizing {}.", DEFAULT_CAMERA_NAME);
            let node = SceneNode::camera(
                DEFAULT_CAMERA_NAME,
                CameraProjection::Perspective {
                    fov_y: defaults.fov_y,
                    aspect: Some(viewport.aspect()),
                    near: defaults.near,
                    far: Some(defaults.far),
                },
            )
            .with_transform(Transform::from_translation(defaults.offset));
            scene.add_to_root(node)
        }
    };
    ResolvedCamera {
        camera,
        source: CameraSource::Synthesized(id),
    }
}
