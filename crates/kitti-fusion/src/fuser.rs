use kitti_fusion_3d::{
    point::{Point3, SensorFrame},
    pointcloud::ColoredPointCloud,
    projection::{PixelCoordinate, ProjectedPoint},
};
use kitti_fusion_image::Image;
use kitti_fusion_imgproc::draw::draw_circle;

use crate::error::FusionError;

/// Rules applied when colorizing from a segmentation mask.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskParams {
    /// Points whose rectified-camera height coordinate is at or above this value are dropped.
    ///
    /// The camera vertical axis points down, so this removes points under the ground plane.
    pub height_ceiling: f64,
    /// The mask color of unlabeled pixels.
    pub background: [u8; 3],
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            height_ceiling: 1.65,
            background: [255, 255, 255],
        }
    }
}

/// Attaches image colors to the sensor points that project into the image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointCloudFuser {
    /// Parameters of the mask path.
    pub mask: MaskParams,
}

fn check_lengths(
    cloud: &[Point3<SensorFrame>],
    projected: &[ProjectedPoint],
) -> Result<(), FusionError> {
    if cloud.len() != projected.len() {
        return Err(FusionError::LengthMismatch(cloud.len(), projected.len()));
    }
    Ok(())
}

/// The pixel of a projected point if it falls inside `image` in front of the camera.
fn frustum_pixel(projected: &ProjectedPoint, image: &Image<u8, 3>) -> Option<PixelCoordinate> {
    if projected.is_on_plane((image.width(), image.height())) {
        projected.pixel
    } else {
        None
    }
}

impl PointCloudFuser {
    /// Create a fuser with the given mask parameters.
    pub fn new(mask: MaskParams) -> Self {
        Self { mask }
    }

    /// Build a colored cloud from the points that land inside `image`.
    ///
    /// # Arguments
    ///
    /// * `cloud` - The sensor points.
    /// * `projected` - The projection of each point of `cloud`, in the same order.
    /// * `image` - The camera image to sample.
    ///
    /// # Returns
    ///
    /// The accepted points, in input order, each colored with the image pixel at its
    /// truncated projection. Points behind the camera or outside the image are dropped.
    pub fn colorize(
        &self,
        cloud: &[Point3<SensorFrame>],
        projected: &[ProjectedPoint],
        image: &Image<u8, 3>,
    ) -> Result<ColoredPointCloud<SensorFrame>, FusionError> {
        check_lengths(cloud, projected)?;

        let mut colored = ColoredPointCloud::with_capacity(cloud.len());
        for (point, proj) in cloud.iter().zip(projected) {
            let Some(pixel) = frustum_pixel(proj, image) else {
                continue;
            };
            let (col, row) = pixel.to_index();
            colored.push(*point, image.get_pixel(col, row)?);
        }

        log::debug!("colorized {} of {} points", colored.len(), cloud.len());

        Ok(colored)
    }

    /// Build a colored cloud from the labeled pixels of a segmentation mask.
    ///
    /// On top of the rules of [`PointCloudFuser::colorize`], a point is dropped when its
    /// mask color is the background color, or when its rectified height coordinate is not
    /// below [`MaskParams::height_ceiling`].
    pub fn colorize_from_mask(
        &self,
        cloud: &[Point3<SensorFrame>],
        projected: &[ProjectedPoint],
        mask: &Image<u8, 3>,
    ) -> Result<ColoredPointCloud<SensorFrame>, FusionError> {
        check_lengths(cloud, projected)?;

        let mut colored = ColoredPointCloud::new();
        for (point, proj) in cloud.iter().zip(projected) {
            let Some(pixel) = frustum_pixel(proj, mask) else {
                continue;
            };
            if proj.rect.y >= self.mask.height_ceiling {
                continue;
            }
            let (col, row) = pixel.to_index();
            let color = mask.get_pixel(col, row)?;
            if color != self.mask.background {
                colored.push(*point, color);
            }
        }

        log::debug!("mask kept {} of {} points", colored.len(), cloud.len());

        Ok(colored)
    }

    /// Burn the projected points into a copy of `image`.
    ///
    /// Every point inside the frustum is drawn as a radius-1 circle whose red channel
    /// grows with the point range: `[min(15·d, 255), 0, 120]`.
    pub fn render_projected_overlay(
        &self,
        image: &Image<u8, 3>,
        cloud: &[Point3<SensorFrame>],
        projected: &[ProjectedPoint],
    ) -> Result<Image<u8, 3>, FusionError> {
        check_lengths(cloud, projected)?;

        let mut overlay = image.clone();
        for (point, proj) in cloud.iter().zip(projected) {
            let Some(pixel) = frustum_pixel(proj, image) else {
                continue;
            };
            let (col, row) = pixel.to_index();
            let center = (col as i64, row as i64);
            draw_circle(&mut overlay, center, 1, range_color(point.norm()));
        }

        Ok(overlay)
    }
}

/// Overlay color of a point at range `d` meters.
pub fn range_color(d: f64) -> [u8; 3] {
    [(15.0 * d).clamp(0.0, 255.0) as u8, 0, 120]
}
