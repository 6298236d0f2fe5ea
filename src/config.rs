//! Viewer configuration.
//!
//! All tunables live in [`ViewerConfig`]. The defaults carry the constants the
//! viewer has always used; callers override them through the `with_*` methods.

use cgmath::{Deg, Vector3};

use crate::resources::ModelFormat;

/// Size of the render surface in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero height yields 1.0 so projections stay finite.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Parameters of the camera placement that frames a freshly loaded model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramingConfig {
    /// Multiplier applied to the fitted distance so the model never touches the frustum.
    pub margin: f32,
    /// Direction of the camera from the origin, scaled by the fitted distance.
    pub direction_weights: Vector3<f32>,
    /// Distance used when the model has no extent.
    pub fallback_distance: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            margin: 2.0,
            direction_weights: Vector3::new(0.7, 0.5, 0.7),
            fallback_distance: 5.0,
        }
    }
}

/// The camera synthesized for models that do not ship one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefaultCameraConfig {
    pub fov_y: Deg<f32>,
    pub near: f32,
    pub far: f32,
    pub offset: Vector3<f32>,
}

impl Default for DefaultCameraConfig {
    fn default() -> Self {
        Self {
            fov_y: Deg(75.0),
            near: 0.1,
            far: 1000.0,
            offset: Vector3::new(0.0, 0.0, 5.0),
        }
    }
}

/// Accepted ranges of the light controls. Values outside are clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlRanges {
    pub intensity: (f32, f32),
    pub position: (f32, f32),
}

impl Default for ControlRanges {
    fn default() -> Self {
        Self {
            intensity: (0.0, 2.0),
            position: (-20.0, 20.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Directory (native) or URL path below the page origin (wasm) that holds the assets.
    pub asset_root: String,
    pub gltf_path: String,
    pub glb_path: String,
    pub viewport: Viewport,
    pub framing: FramingConfig,
    pub default_camera: DefaultCameraConfig,
    pub controls: ControlRanges,
}

impl ViewerConfig {
    pub fn asset_path(&self, format: ModelFormat) -> &str {
        match format {
            ModelFormat::Gltf => &self.gltf_path,
            ModelFormat::Glb => &self.glb_path,
        }
    }

    pub fn with_asset_root(mut self, root: impl Into<String>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_asset_path(mut self, format: ModelFormat, path: impl Into<String>) -> Self {
        match format {
            ModelFormat::Gltf => self.gltf_path = path.into(),
            ModelFormat::Glb => self.glb_path = path.into(),
        }
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_framing(mut self, framing: FramingConfig) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_default_camera(mut self, default_camera: DefaultCameraConfig) -> Self {
        self.default_camera = default_camera;
        self
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_root: "assets".to_string(),
            gltf_path: "models/model.gltf".to_string(),
            glb_path: "models/model.glb".to_string(),
            viewport: Viewport::default(),
            framing: FramingConfig::default(),
            default_camera: DefaultCameraConfig::default(),
            controls: ControlRanges::default(),
        }
    }
}
