mod radius;
mod statistical;

pub use radius::RadiusOutlierRemoval;
pub use statistical::StatisticalOutlierRemoval;

use crate::{point::Frame, pointcloud::ColoredPointCloud};

/// Two-stage density based denoising: statistical removal, then radius removal.
///
/// The stage order is fixed. Each stage returns a new cloud that preserves the relative
/// order of the surviving points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutlierFilterPipeline {
    /// First stage.
    pub statistical: StatisticalOutlierRemoval,
    /// Second stage.
    pub radius: RadiusOutlierRemoval,
}

impl OutlierFilterPipeline {
    /// Create a pipeline from its two stages.
    pub fn new(statistical: StatisticalOutlierRemoval, radius: RadiusOutlierRemoval) -> Self {
        Self {
            statistical,
            radius,
        }
    }

    /// Run both stages over `cloud`.
    ///
    /// Example:
    ///
    /// ```
    /// use kitti_fusion_3d::filter::OutlierFilterPipeline;
    /// use kitti_fusion_3d::pointcloud::ColoredPointCloud;
    /// use kitti_fusion_3d::point::SensorFrame;
    ///
    /// let cloud = ColoredPointCloud::<SensorFrame>::new();
    /// assert!(OutlierFilterPipeline::default().denoise(&cloud).is_empty());
    /// ```
    pub fn denoise<F: Frame>(&self, cloud: &ColoredPointCloud<F>) -> ColoredPointCloud<F> {
        let after_statistical = self.statistical.filter(cloud);
        let after_radius = self.radius.filter(&after_statistical);

        log::debug!(
            "denoise: {} -> {} (statistical) -> {} (radius)",
            cloud.len(),
            after_statistical.len(),
            after_radius.len()
        );

        after_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Point3, SensorFrame};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_denoise_drops_sparse_points() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut cloud = ColoredPointCloud::<SensorFrame>::new();
        for _ in 0..400 {
            let p = Point3::new(
                5.0 + 0.5 * rng.random::<f64>(),
                1.0 + 0.5 * rng.random::<f64>(),
                -1.0 + 0.5 * rng.random::<f64>(),
            );
            cloud.push(p, [0, 128, 0]);
        }
        cloud.push(Point3::new(40.0, -12.0, 3.0), [255, 0, 0]);
        cloud.push(Point3::new(-25.0, 8.0, 0.0), [255, 0, 0]);

        let denoised = OutlierFilterPipeline::default().denoise(&cloud);
        assert!(!denoised.is_empty());
        assert!(denoised.len() < cloud.len());
        assert!(denoised.colors().iter().all(|c| *c == [0, 128, 0]));
    }

    #[test]
    fn test_denoise_radius_sees_statistical_output() {
        // the isolated pair survives the statistical stage on its own but not the radius stage
        let cloud: ColoredPointCloud<SensorFrame> = [[0.0, 0.0, 0.0], [0.05, 0.0, 0.0]]
            .into_iter()
            .map(|p| crate::pointcloud::ColoredPoint3 {
                point: Point3::from_array(p),
                color: [1, 2, 3],
            })
            .collect();
        let pipeline = OutlierFilterPipeline::default();
        assert_eq!(pipeline.statistical.filter(&cloud).len(), 2);
        assert!(pipeline.denoise(&cloud).is_empty());
    }
}
