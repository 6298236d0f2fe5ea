use cgmath::Point3;

use crate::data_structures::bounds::BoundingBox;

/// Vertex positions of one drawable primitive plus its optional index list.
///
/// Indices come in strides of three (one triangle each). Without indices the
/// positions themselves are read in strides of three.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn new(positions: Vec<[f32; 3]>, indices: Option<Vec<u32>>) -> Self {
        Self { positions, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Triangle count as a real number. Truncation is left to the caller so
    /// partial triangles of several meshes are not rounded away one by one.
    pub fn triangle_estimate(&self) -> f64 {
        match &self.indices {
            Some(indices) => indices.len() as f64 / 3.0,
            None => self.positions.len() as f64 / 3.0,
        }
    }

    /// Local-space box of all positions, `None` without positions.
    pub fn bounding(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions.iter().map(|&p| Point3::from(p)))
    }
}
