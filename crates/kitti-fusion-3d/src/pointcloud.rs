use glam::DVec3;

use crate::{
    linalg::{transform_points, RigidTransform},
    point::{Frame, Point3},
};

/// A point with an RGB color attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColoredPoint3<F> {
    /// The point.
    pub point: Point3<F>,
    /// The color as `[r, g, b]`.
    pub color: [u8; 3],
}

/// An ordered point cloud with one color per point.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredPointCloud<F> {
    // The points in the point cloud.
    points: Vec<Point3<F>>,
    // The colors of the points, same length as `points`.
    colors: Vec<[u8; 3]>,
}

impl<F: Frame> Default for ColoredPointCloud<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Frame> ColoredPointCloud<F> {
    /// Create an empty point cloud.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            colors: Vec::new(),
        }
    }

    /// Create an empty point cloud with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Append a point and its color.
    pub fn push(&mut self, point: Point3<F>, color: [u8; 3]) {
        self.points.push(point);
        self.colors.push(color);
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[Point3<F>] {
        &self.points
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Get the colored point at `index`.
    pub fn get(&self, index: usize) -> Option<ColoredPoint3<F>> {
        Some(ColoredPoint3 {
            point: *self.points.get(index)?,
            color: *self.colors.get(index)?,
        })
    }

    /// Iterate over the colored points in order.
    pub fn iter(&self) -> impl Iterator<Item = ColoredPoint3<F>> + '_ {
        self.points
            .iter()
            .zip(self.colors.iter())
            .map(|(point, color)| ColoredPoint3 {
                point: *point,
                color: *color,
            })
    }

    /// Keep the points whose entry in `mask` is `true`, preserving their relative order.
    ///
    /// Entries beyond the end of `mask` are dropped.
    pub fn select(&self, mask: &[bool]) -> Self {
        self.iter()
            .zip(mask.iter())
            .filter_map(|(p, keep)| keep.then_some(p))
            .collect()
    }

    /// Express the cloud in another frame, keeping every color with its point.
    pub fn transform<Dst: Frame>(
        &self,
        dst_t_src: &RigidTransform<F, Dst>,
    ) -> ColoredPointCloud<Dst> {
        ColoredPointCloud {
            points: transform_points(&self.points, dst_t_src),
            colors: self.colors.clone(),
        }
    }

    /// Get the minimum bound of the point cloud, zero when empty.
    pub fn min_bound(&self) -> Point3<F> {
        self.fold_bound(DVec3::min)
    }

    /// Get the maximum bound of the point cloud, zero when empty.
    pub fn max_bound(&self) -> Point3<F> {
        self.fold_bound(DVec3::max)
    }

    fn fold_bound(&self, f: impl Fn(DVec3, DVec3) -> DVec3) -> Point3<F> {
        let Some(first) = self.points.first() else {
            return Point3::default();
        };
        self.points
            .iter()
            .map(Point3::to_dvec3)
            .fold(first.to_dvec3(), f)
            .into()
    }
}

impl<F: Frame> FromIterator<ColoredPoint3<F>> for ColoredPointCloud<F> {
    fn from_iter<I: IntoIterator<Item = ColoredPoint3<F>>>(iter: I) -> Self {
        let mut cloud = Self::new();
        for p in iter {
            cloud.push(p.point, p.color);
        }
        cloud
    }
}
