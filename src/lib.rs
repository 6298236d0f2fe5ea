//! view-ngin
//!
//! The core of a GLTF/GLB model viewer for native and WASM targets. It loads an
//! asset into an owned scene graph, collects geometry statistics, centers the
//! model at the origin and places a camera that frames it. Rasterization and
//! orbit controls are left to the embedding application, which reads camera
//! and light state from the session between frames.
//!
//! High-level modules
//! - `camera`: camera state and resolution of the camera to view a model with
//! - `config`: viewer configuration and its defaults
//! - `controls`: light and camera controls applied to a session
//! - `data_structures`: scene graph, geometry, bounds and lights
//! - `error`: load failures and parse errors
//! - `framing`: auto-centering and camera placement
//! - `lights`: the viewer's ambient and directional light
//! - `resources`: asset transport and glTF conversion
//! - `session`: the viewer session and its load generations
//! - `stats`: per-format model statistics
//!

pub mod camera;
pub mod config;
pub mod controls;
pub mod data_structures;
pub mod error;
pub mod framing;
pub mod lights;
pub mod resources;
pub mod session;
pub mod stats;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use winit::event::WindowEvent;

/// Installs the log backend: `env_logger` (honouring `RUST_LOG`) on native,
/// the browser console on WASM. A second call only prints a warning.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        // Fails only if a logger is already installed
        let _ = console_log::init_with_level(log::Level::Info);
    }
}
