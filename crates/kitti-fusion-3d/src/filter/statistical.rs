use std::num::NonZeroUsize;

use kiddo::immutable::float::kdtree::ImmutableKdTree;

use crate::{
    point::{Frame, Point3},
    pointcloud::ColoredPointCloud,
};

/// Rejects points whose mean distance to their nearest neighbors is unusually large.
///
/// For every point the mean Euclidean distance to its `mean_k` nearest neighbors
/// (the point itself excluded) is computed. A point is an outlier when its mean
/// distance exceeds `μ + std_mul · σ`, with `μ` and `σ` the mean and sample standard
/// deviation of all the per-point mean distances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatisticalOutlierRemoval {
    /// Number of neighbors used to estimate the local density.
    pub mean_k: usize,
    /// Standard deviation multiplier of the rejection threshold.
    pub std_mul: f64,
}

impl Default for StatisticalOutlierRemoval {
    fn default() -> Self {
        Self {
            mean_k: 12,
            std_mul: 0.2,
        }
    }
}

impl StatisticalOutlierRemoval {
    /// Compute which points are inliers.
    ///
    /// # Returns
    ///
    /// One flag per input point, `true` for inliers. Clouds with fewer than two points
    /// are kept entirely.
    pub fn inlier_mask<F: Frame>(&self, points: &[Point3<F>]) -> Vec<bool> {
        let n = points.len();
        if n < 2 || self.mean_k == 0 {
            return vec![true; n];
        }

        let coords = points.iter().map(Point3::to_array).collect::<Vec<_>>();
        let kdtree: ImmutableKdTree<f64, u32, 3, 32> = ImmutableKdTree::new_from_slice(&coords);

        let k = self.mean_k.min(n - 1);
        if k < self.mean_k {
            log::debug!("cloud of {} points, using {} neighbors instead of {}", n, k, self.mean_k);
        }

        // ask for one extra neighbor since the query point finds itself
        let qty = NonZeroUsize::MIN.saturating_add(k);
        let mean_distances = coords
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let neighbors = kdtree.nearest_n::<kiddo::SquaredEuclidean>(p, qty);
                let (sum, count) = neighbors
                    .iter()
                    .filter(|nn| nn.item as usize != i)
                    .take(k)
                    .fold((0.0, 0usize), |(sum, count), nn| (sum + nn.distance.sqrt(), count + 1));
                if count == 0 {
                    0.0
                } else {
                    sum / count as f64
                }
            })
            .collect::<Vec<_>>();

        let mean = mean_distances.iter().sum::<f64>() / n as f64;
        let variance = mean_distances
            .iter()
            .map(|d| (d - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        let threshold = mean + self.std_mul * variance.sqrt();

        log::debug!("statistical filter: mean {:.4}, threshold {:.4}", mean, threshold);

        mean_distances.iter().map(|d| *d <= threshold).collect()
    }

    /// Remove the outliers of a cloud, preserving the relative order of the inliers.
    pub fn filter<F: Frame>(&self, cloud: &ColoredPointCloud<F>) -> ColoredPointCloud<F> {
        cloud.select(&self.inlier_mask(cloud.points()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::SensorFrame;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_cluster(num_points: usize, seed: u64) -> Vec<Point3<SensorFrame>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..num_points)
            .map(|_| {
                Point3::new(
                    rng.random::<f64>(),
                    rng.random::<f64>(),
                    rng.random::<f64>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_far_outlier_is_rejected() {
        let mut points = random_cluster(300, 42);
        points.push(Point3::new(100.0, 100.0, 100.0));

        let mask = StatisticalOutlierRemoval::default().inlier_mask(&points);
        assert_eq!(mask.len(), points.len());
        assert_eq!(mask.last(), Some(&false));
        assert!(mask.iter().any(|keep| *keep));
    }

    #[test]
    fn test_far_outlier_keeps_existing_inliers() {
        let filter = StatisticalOutlierRemoval::default();
        let mut points = random_cluster(300, 7);
        let before = filter.inlier_mask(&points);

        points.push(Point3::new(100.0, 100.0, 100.0));
        let after = filter.inlier_mask(&points);

        assert_eq!(after.len(), before.len() + 1);
        for (i, (was, is)) in before.iter().zip(&after).enumerate() {
            assert!(!*was || *is, "point {i} dropped after adding a far outlier");
        }
        assert_eq!(after.last(), Some(&false));
    }

    #[test]
    fn test_deterministic() {
        let points = random_cluster(200, 7);
        let filter = StatisticalOutlierRemoval::default();
        assert_eq!(filter.inlier_mask(&points), filter.inlier_mask(&points));
    }

    #[test]
    fn test_tiny_clouds_pass() {
        let filter = StatisticalOutlierRemoval::default();
        assert!(filter.inlier_mask::<SensorFrame>(&[]).is_empty());
        assert_eq!(filter.inlier_mask(&[Point3::<SensorFrame>::new(1.0, 2.0, 3.0)]), vec![true]);
        // two points are each other's only neighbor, so their mean distances agree
        let pair = [
            Point3::<SensorFrame>::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
        ];
        assert_eq!(filter.inlier_mask(&pair), vec![true, true]);
    }

    #[test]
    fn test_filter_keeps_colors_with_points() {
        let mut cloud = ColoredPointCloud::<SensorFrame>::new();
        for (i, p) in random_cluster(100, 3).into_iter().enumerate() {
            cloud.push(p, [i as u8, 0, 0]);
        }
        cloud.push(Point3::new(-50.0, 20.0, 80.0), [255, 255, 255]);

        let filtered = StatisticalOutlierRemoval::default().filter(&cloud);
        assert!(filtered.len() < cloud.len());
        assert!(filtered.colors().iter().all(|c| *c != [255, 255, 255]));
        for p in filtered.iter() {
            let index = p.color[0] as usize;
            assert_eq!(cloud.points()[index], p.point);
        }
    }
}
