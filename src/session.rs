//! The viewer session.
//!
//! A [`ViewerSession`] owns everything one viewer instance mutates: the scene,
//! the current model, the camera, the light rig and the statistics record of
//! each format. Loads are split in two halves so the fetch can run without
//! borrowing the session:
//!
//! ```no_run
//! # async fn demo() {
//! use view_ngin::{config::ViewerConfig, resources::ModelFormat, session::ViewerSession};
//!
//! let mut session = ViewerSession::new(ViewerConfig::default());
//! let ticket = session.begin_load(ModelFormat::Glb);
//! let result = ticket.fetch().await;
//! let outcome = session.complete_load(ticket, result);
//! # }
//! ```
//!
//! Every [`ViewerSession::begin_load`] issues a new generation. A completion
//! whose generation is no longer the latest is discarded, so the last request
//! wins and an orphaned model never reaches the scene.

use std::collections::HashMap;

use log::{debug, error, info, warn};
use winit::event::WindowEvent;

use crate::{
    camera::{CameraSource, CameraState, resolve_camera},
    config::{Viewport, ViewerConfig},
    data_structures::scene_graph::{NodeId, SceneGraph, SceneNode},
    error::LoadFailure,
    framing::{FrameComposer, FramedView},
    lights::LightRig,
    resources::{LoadedAsset, ModelFormat, load_model_gltf},
    stats::{LoadTiming, ModelStatistics, StatisticsCollector},
};

/// Name of the viewer scene root.
pub const SCENE_ROOT_NAME: &str = "Scene";

/// Handle of one requested load.
///
/// Consumed by [`ViewerSession::complete_load`], so a load completes at most once.
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    format: ModelFormat,
    started: instant::Instant,
    root: String,
    path: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn format(&self) -> ModelFormat {
        self.format
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetches and parses the requested asset. Progress is logged at debug level.
    pub async fn fetch(&self) -> Result<LoadedAsset, LoadFailure> {
        let format = self.format;
        load_model_gltf(&self.root, &self.path, |progress| {
            match progress.fraction() {
                Some(fraction) => debug!("Loading {}: {:.0}%", format, fraction * 100.0),
                None => debug!("Loading {}: {} bytes", format, progress.loaded),
            }
        })
        .await
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// The model is in the scene and framed.
    Applied(ModelStatistics),
    /// A newer load was requested in the meantime; the result was dropped.
    Stale { generation: u64, latest: u64 },
    /// The load failed. The previous model was already removed.
    Failed(LoadFailure),
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied(_))
    }
}

pub struct ViewerSession {
    pub(crate) config: ViewerConfig,
    pub(crate) scene: SceneGraph,
    pub(crate) camera: CameraState,
    pub(crate) lights: LightRig,
    pub(crate) framed: Option<FramedView>,
    pub(crate) format: ModelFormat,
    camera_source: Option<CameraSource>,
    composer: FrameComposer,
    model: Option<NodeId>,
    generation: u64,
    stats: HashMap<ModelFormat, ModelStatistics>,
}

impl ViewerSession {
    pub fn new(config: ViewerConfig) -> Self {
        let mut scene = SceneGraph::new(SCENE_ROOT_NAME);
        let lights = LightRig::install(&mut scene);
        let camera = CameraState::from_defaults(&config.default_camera, config.viewport);
        let composer = FrameComposer::new(config.framing);
        Self {
            config,
            scene,
            camera,
            lights,
            framed: None,
            format: ModelFormat::Gltf,
            camera_source: None,
            composer,
            model: None,
            generation: 0,
            stats: HashMap::new(),
        }
    }

    /// Starts a load of `format`: the current model leaves the scene, a new
    /// generation is issued and the statistics record of `format` is reset.
    pub fn begin_load(&mut self, format: ModelFormat) -> LoadTicket {
        if let Some(id) = self.model.take() {
            if let Some(old) = self.scene.remove(id) {
                debug!("Removed model {} from the scene.", old.name);
            }
        }
        self.framed = None;
        self.generation += 1;
        self.format = format;
        self.stats.insert(format, ModelStatistics::default());

        let ticket = LoadTicket {
            generation: self.generation,
            format,
            started: instant::Instant::now(),
            root: self.config.asset_root.clone(),
            path: self.config.asset_path(format).to_string(),
        };
        info!("Loading {} model from {} (load #{}).", format, ticket.path, ticket.generation);
        ticket
    }

    /// Applies the result of `ticket`'s load if it is still the latest one.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedAsset, LoadFailure>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            warn!(
                "Discarding {} load #{}: load #{} was requested after it.",
                ticket.format, ticket.generation, self.generation
            );
            return LoadOutcome::Stale {
                generation: ticket.generation,
                latest: self.generation,
            };
        }

        let asset = match result {
            Ok(asset) => asset,
            Err(err) => {
                error!("Failed to load {} model {}: {}", ticket.format, ticket.path, err);
                return LoadOutcome::Failed(err);
            }
        };

        let timing = LoadTiming::since(ticket.started);
        let stats = StatisticsCollector::collect(&asset.model, timing, asset.total_bytes);
        self.stats.insert(ticket.format, stats);

        let model = self.scene.add_to_root(asset.model);
        self.model = Some(model);

        let resolved = resolve_camera(
            &mut self.scene,
            model,
            self.config.viewport,
            &self.config.default_camera,
        );
        self.camera = resolved.camera;
        self.camera_source = Some(resolved.source);

        let framed = self.composer.compose(&mut self.scene, &mut self.camera);
        self.framed = Some(framed);

        info!("Loaded {} model: {}", ticket.format, stats);
        LoadOutcome::Applied(stats)
    }

    /// Requests, fetches and applies a load in one go.
    pub async fn load(&mut self, format: ModelFormat) -> LoadOutcome {
        let ticket = self.begin_load(format);
        let result = ticket.fetch().await;
        self.complete_load(ticket, result)
    }

    /// Follows a new surface size. Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.viewport = Viewport::new(width, height);
        self.camera.resize(width, height);
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            self.resize(size.width, size.height);
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn camera_source(&self) -> Option<CameraSource> {
        self.camera_source
    }

    pub fn lights(&self) -> LightRig {
        self.lights
    }

    /// Format of the most recent load request.
    pub fn format(&self) -> ModelFormat {
        self.format
    }

    pub fn model_id(&self) -> Option<NodeId> {
        self.model
    }

    pub fn model(&self) -> Option<&SceneNode> {
        self.model.and_then(|id| self.scene.get(id))
    }

    pub fn stats(&self, format: ModelFormat) -> Option<&ModelStatistics> {
        self.stats.get(&format)
    }

    pub fn framed(&self) -> Option<&FramedView> {
        self.framed.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::data_structures::geometry::Geometry;

    fn asset(name: &str) -> LoadedAsset {
        LoadedAsset {
            model: SceneNode::group(name).with_child(SceneNode::mesh(
                "triangle",
                Geometry::new(vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]], None),
            )),
            total_bytes: Some(2048),
        }
    }

    #[test]
    fn begin_load_resets_the_record_and_removes_the_model() {
        let mut session = ViewerSession::default();
        let ticket = session.begin_load(ModelFormat::Gltf);
        assert!(session.complete_load(ticket, Ok(asset("a"))).is_applied());
        assert_eq!(session.stats(ModelFormat::Gltf).unwrap().mesh_count, 1);

        let ticket = session.begin_load(ModelFormat::Gltf);
        assert_eq!(ticket.generation(), 2);
        assert!(session.model().is_none());
        assert_eq!(session.framed(), None);
        assert_eq!(session.stats(ModelFormat::Gltf), Some(&ModelStatistics::default()));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut session = ViewerSession::default();
        let first = session.begin_load(ModelFormat::Gltf);
        let second = session.begin_load(ModelFormat::Glb);

        assert!(session.complete_load(second, Ok(asset("glb"))).is_applied());
        let outcome = session.complete_load(first, Ok(asset("gltf")));

        assert!(matches!(outcome, LoadOutcome::Stale { generation: 1, latest: 2 }));
        assert_eq!(session.model().unwrap().name, "glb");
        assert_eq!(session.format(), ModelFormat::Glb);
        // the stale load reset its record when it started and never filled it
        assert_eq!(session.stats(ModelFormat::Gltf), Some(&ModelStatistics::default()));
    }

    #[test]
    fn failed_load_leaves_an_empty_viewport() {
        let mut session = ViewerSession::default();
        let ticket = session.begin_load(ModelFormat::Gltf);
        session.complete_load(ticket, Ok(asset("a")));

        let ticket = session.begin_load(ModelFormat::Glb);
        let outcome = session.complete_load(ticket, Err(LoadFailure::MissingScene("b".into())));

        assert!(matches!(outcome, LoadOutcome::Failed(LoadFailure::MissingScene(_))));
        assert!(session.model().is_none());
        assert_eq!(session.stats(ModelFormat::Glb), Some(&ModelStatistics::default()));
        assert_eq!(session.stats(ModelFormat::Gltf).unwrap().mesh_count, 1);
    }

    #[test]
    fn applied_load_frames_the_model() {
        let mut session = ViewerSession::default();
        let ticket = session.begin_load(ModelFormat::Glb);
        session.complete_load(ticket, Ok(asset("model")));

        assert!(matches!(session.camera_source(), Some(CameraSource::Synthesized(_))));
        let framed = session.framed().unwrap();
        assert_eq!(framed.model_group, session.model_id());
        assert_eq!(session.camera().target, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(session.camera().position, framed.position);
        assert_eq!(session.stats(ModelFormat::Glb).unwrap().file_size_kb, Some(2.0));
    }

    #[test]
    fn resize_updates_aspect_and_ignores_zero() {
        let mut session = ViewerSession::default();
        session.resize(1000, 500);
        assert_eq!(session.camera().aspect, 2.0);
        assert_eq!(session.config().viewport, Viewport::new(1000, 500));

        session.resize(0, 500);
        assert_eq!(session.camera().aspect, 2.0);
        assert_eq!(session.config().viewport, Viewport::new(1000, 500));
    }

    #[test]
    fn synthesized_camera_follows_the_current_viewport() {
        let mut session = ViewerSession::default();
        session.resize(400, 400);
        let ticket = session.begin_load(ModelFormat::Gltf);
        session.complete_load(ticket, Ok(asset("model")));
        assert_eq!(session.camera().aspect, 1.0);
    }
}
