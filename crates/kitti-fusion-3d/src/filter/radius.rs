use kiddo::immutable::float::kdtree::ImmutableKdTree;

use crate::{
    point::{Frame, Point3},
    pointcloud::ColoredPointCloud,
};

/// Rejects points with too few other points in their neighborhood.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusOutlierRemoval {
    /// Radius of the neighborhood in meters.
    pub radius: f64,
    /// Minimum number of other points within `radius` for a point to be kept.
    pub min_neighbors: usize,
}

impl Default for RadiusOutlierRemoval {
    fn default() -> Self {
        Self {
            radius: 0.3,
            min_neighbors: 4,
        }
    }
}

impl RadiusOutlierRemoval {
    /// Compute which points are inliers, one flag per input point.
    pub fn inlier_mask<F: Frame>(&self, points: &[Point3<F>]) -> Vec<bool> {
        if points.is_empty() {
            return Vec::new();
        }

        let coords = points.iter().map(Point3::to_array).collect::<Vec<_>>();
        let kdtree: ImmutableKdTree<f64, u32, 3, 32> = ImmutableKdTree::new_from_slice(&coords);
        let radius_sq = self.radius * self.radius;

        coords
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let neighbors = kdtree
                    .within_unsorted::<kiddo::SquaredEuclidean>(p, radius_sq)
                    .iter()
                    .filter(|nn| nn.item as usize != i)
                    .count();
                neighbors >= self.min_neighbors
            })
            .collect()
    }

    /// Remove the outliers of a cloud, preserving the relative order of the inliers.
    pub fn filter<F: Frame>(&self, cloud: &ColoredPointCloud<F>) -> ColoredPointCloud<F> {
        cloud.select(&self.inlier_mask(cloud.points()))
    }
}
