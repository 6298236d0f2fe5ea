//! Viewer data structures: scene graphs, geometry, lights and bounds.
//!
//! - `scene_graph` holds the owned node tree and its traversals
//! - `geometry` holds vertex positions and indices of a drawable primitive
//! - `bounds` is the axis-aligned box used for framing
//! - `light` holds light emission data and colors
//! - `transform` holds node-local placement

pub mod bounds;
pub mod geometry;
pub mod light;
pub mod scene_graph;
pub mod transform;
