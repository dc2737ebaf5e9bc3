use crate::{
    calibration::KittiCalibration,
    linalg::{ProjectionMatrix, RigidTransform},
    point::{Point3, RectCameraFrame, SensorFrame},
};

/// Perspective divisors at or below this value are treated as "not on the image plane".
pub const PROJECTION_EPSILON: f64 = 1e-6;

/// Width and height of the image a pixel may land in.
pub type PlaneSize = (usize, usize);

/// A continuous image-plane coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelCoordinate {
    /// Horizontal coordinate (column).
    pub u: f64,
    /// Vertical coordinate (row).
    pub v: f64,
}

impl PixelCoordinate {
    /// Check whether the pixel lies within `[0, W-1] × [0, H-1]`.
    pub fn is_within(&self, (width, height): PlaneSize) -> bool {
        width > 0
            && height > 0
            && self.u >= 0.0
            && self.u <= (width - 1) as f64
            && self.v >= 0.0
            && self.v <= (height - 1) as f64
    }

    /// Integer pixel `(col, row)` obtained by truncation.
    ///
    /// Only meaningful for non-negative coordinates, see [`PixelCoordinate::is_within`].
    pub fn to_index(&self) -> (usize, usize) {
        (self.u as usize, self.v as usize)
    }
}

/// The projection of a single sensor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    /// The point in the rectified camera frame.
    pub rect: Point3<RectCameraFrame>,
    /// The image-plane coordinate, `None` when the perspective divisor is degenerate.
    pub pixel: Option<PixelCoordinate>,
}

impl ProjectedPoint {
    /// Depth of the point along the camera optical axis.
    pub fn depth(&self) -> f64 {
        self.rect.z
    }

    /// A point is on the plane when it has a pixel inside the image and lies in front of
    /// the camera.
    pub fn is_on_plane(&self, size: PlaneSize) -> bool {
        self.depth() > 0.0 && self.pixel.is_some_and(|px| px.is_within(size))
    }
}

/// Maps sensor-frame points to image pixels through the calibration chain
/// `sensor -> rectified camera -> image plane`.
///
/// The projector never drops points: every input gets a [`ProjectedPoint`] so that
/// overlay consumers can see everything while colorization consumers filter with
/// [`ProjectedPoint::is_on_plane`].
#[derive(Clone, Debug)]
pub struct CoordinateProjector {
    sensor_to_rect: RigidTransform<SensorFrame, RectCameraFrame>,
    rect_to_image: ProjectionMatrix<RectCameraFrame>,
}

impl CoordinateProjector {
    /// Create a projector from the two calibration stages.
    pub fn new(
        sensor_to_rect: RigidTransform<SensorFrame, RectCameraFrame>,
        rect_to_image: ProjectionMatrix<RectCameraFrame>,
    ) -> Self {
        Self {
            sensor_to_rect,
            rect_to_image,
        }
    }

    /// Create a projector for the left color camera (`P2`) of a KITTI calibration.
    pub fn from_calibration(calib: &KittiCalibration) -> Self {
        Self::new(calib.sensor_to_rect(), calib.rect_to_image())
    }

    /// The sensor to rectified camera transform.
    pub fn sensor_to_rect(&self) -> &RigidTransform<SensorFrame, RectCameraFrame> {
        &self.sensor_to_rect
    }

    /// The rectified camera to image projection.
    pub fn rect_to_image(&self) -> &ProjectionMatrix<RectCameraFrame> {
        &self.rect_to_image
    }

    /// Project a single sensor point.
    pub fn project_point(&self, point: &Point3<SensorFrame>) -> ProjectedPoint {
        let homogeneous = point.to_homogeneous();
        let rect = self.sensor_to_rect.apply_homogeneous(&homogeneous);
        let [su, sv, s] = self.rect_to_image.apply(&rect);

        let pixel = if s > PROJECTION_EPSILON {
            Some(PixelCoordinate {
                u: su / s,
                v: sv / s,
            })
        } else {
            None
        };

        ProjectedPoint { rect, pixel }
    }

    /// Project a set of sensor points, preserving input order.
    ///
    /// # Arguments
    ///
    /// * `points` - Points in the sensor frame.
    ///
    /// # Returns
    ///
    /// One [`ProjectedPoint`] per input point. An empty input yields an empty output.
    pub fn project(&self, points: &[Point3<SensorFrame>]) -> Vec<ProjectedPoint> {
        points.iter().map(|p| self.project_point(p)).collect()
    }
}
