//! Geometry statistics of a loaded model.

use std::fmt;

use log::debug;

use crate::data_structures::scene_graph::SceneNode;

/// Start and completion instants of one load.
#[derive(Clone, Copy, Debug)]
pub struct LoadTiming {
    pub started: instant::Instant,
    pub completed: instant::Instant,
}

impl LoadTiming {
    pub fn new(started: instant::Instant, completed: instant::Instant) -> Self {
        Self { started, completed }
    }

    /// Timing that ends now.
    pub fn since(started: instant::Instant) -> Self {
        Self::new(started, instant::Instant::now())
    }

    pub fn elapsed_ms(&self) -> f64 {
        if self.completed <= self.started {
            return 0.0;
        }
        self.completed.duration_since(self.started).as_secs_f64() * 1000.0
    }
}

/// Statistics record of one format key.
///
/// `file_size_kb` stays `None` when the transport never announced a total.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModelStatistics {
    pub load_time_ms: f64,
    pub file_size_kb: Option<f64>,
    pub vertex_count: u64,
    pub triangle_count: u64,
    pub mesh_count: u64,
}

impl ModelStatistics {
    pub fn load_time_display(&self) -> String {
        format!("{:.2}", self.load_time_ms)
    }

    pub fn file_size_display(&self) -> String {
        format!("{:.2}", self.file_size_kb.unwrap_or(0.0))
    }
}

impl fmt::Display for ModelStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "load {} ms, size {} KB, {} vertices, {} triangles, {} meshes",
            self.load_time_display(),
            self.file_size_display(),
            self.vertex_count,
            self.triangle_count,
            self.mesh_count
        )
    }
}

pub struct StatisticsCollector;

impl StatisticsCollector {
    /// Aggregates mesh, vertex and triangle counts over `model` in one
    /// depth-first pass. Triangle contributions are summed as reals and
    /// floored once at the end.
    pub fn collect(
        model: &SceneNode,
        timing: LoadTiming,
        total_bytes: Option<u64>,
    ) -> ModelStatistics {
        let mut mesh_count = 0u64;
        let mut vertex_count = 0u64;
        let mut triangles = 0.0f64;
        model.traverse(&mut |node| {
            if let Some(mesh) = node.as_mesh() {
                mesh_count += 1;
                vertex_count += mesh.geometry.vertex_count() as u64;
                triangles += mesh.geometry.triangle_estimate();
            }
        });

        let stats = ModelStatistics {
            load_time_ms: timing.elapsed_ms(),
            file_size_kb: total_bytes.map(|bytes| bytes as f64 / 1024.0),
            vertex_count,
            triangle_count: triangles.floor() as u64,
            mesh_count,
        };
        debug!("Collected statistics for {}: {}", model.name, stats);
        stats
    }
}
