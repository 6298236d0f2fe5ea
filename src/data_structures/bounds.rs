use cgmath::{EuclideanSpace, Matrix4, Point3, Transform as _, Vector3};

/// Axis-aligned bounding box.
///
/// An empty set of points has no box; callers keep an `Option<BoundingBox>`
/// and treat `None` as a zero-size box at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        points.into_iter().fold(None, |acc, point| match acc {
            Some(bounds) => Some(bounds.expanded_by_point(point)),
            None => Some(Self::new(point, point)),
        })
    }

    pub fn expanded_by_point(&self, point: Point3<f32>) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(point.x),
                self.min.y.min(point.y),
                self.min.z.min(point.z),
            ),
            max: Point3::new(
                self.max.x.max(point.x),
                self.max.y.max(point.y),
                self.max.z.max(point.z),
            ),
        }
    }

    pub fn merge(&self, other: &BoundingBox) -> Self {
        self.expanded_by_point(other.min)
            .expanded_by_point(other.max)
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (min, max) = (self.min, self.max);
        [
            Point3::new(min.x, min.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, max.y, max.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(max.x, max.y, max.z),
        ]
    }

    /// Box enclosing this box after `matrix` is applied to all eight corners.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = self.corners().map(|corner| matrix.transform_point(corner));
        // Eight corners, never empty
        Self::from_points(corners).unwrap_or(*self)
    }

    pub fn center(&self) -> Point3<f32> {
        self.min.midpoint(self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Largest of the three extents.
    pub fn max_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }
}
