use glam::DVec3;

use crate::{
    point::{Point3, RectCameraFrame},
    transforms::rotate_yaw,
};

/// The physical extents of a 3D box in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxDimensions {
    /// Height, along the camera vertical axis.
    pub h: f64,
    /// Width, the lateral extent.
    pub w: f64,
    /// Length, the forward extent.
    pub l: f64,
}

/// The 8 corners of an oriented 3D box in the rectified camera frame.
///
/// Corners `0..4` form the bottom face in a fixed cyclic order and corners `4..8`
/// form the top face in the same order, so that corner `i + 4` lies directly
/// above corner `i`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
    /// The corners, bottom face first.
    pub corners: [Point3<RectCameraFrame>; 8],
}

impl OrientedBox {
    /// The 4 bottom corners.
    pub fn bottom_face(&self) -> [Point3<RectCameraFrame>; 4] {
        [self.corners[0], self.corners[1], self.corners[2], self.corners[3]]
    }

    /// The 4 top corners.
    pub fn top_face(&self) -> [Point3<RectCameraFrame>; 4] {
        [self.corners[4], self.corners[5], self.corners[6], self.corners[7]]
    }

    /// Two closed line strips, `0-1-2-3-0` and `4-5-6-7-4`.
    ///
    /// The vertical edges joining the faces are not part of the strips.
    pub fn wireframe_loops(&self) -> [[Point3<RectCameraFrame>; 5]; 2] {
        let c = &self.corners;
        [
            [c[0], c[1], c[2], c[3], c[0]],
            [c[4], c[5], c[6], c[7], c[4]],
        ]
    }

    /// The centroid of the 8 corners.
    pub fn centroid(&self) -> Point3<RectCameraFrame> {
        let sum = self
            .corners
            .iter()
            .fold(DVec3::ZERO, |acc, c| acc + c.to_dvec3());
        (sum / 8.0).into()
    }
}

/// Reconstruct the 8 corners of an oriented box.
///
/// # Arguments
///
/// * `dimensions` - The box extents.
/// * `center` - The bottom-center of the box in the rectified camera frame.
/// * `yaw` - The rotation about the camera vertical axis in radians.
///
/// # Returns
///
/// The box corners. The bottom face sits at the center's y and the top face at
/// `y - h`, since the camera vertical axis points down.
///
/// Example:
///
/// ```
/// use kitti_fusion_3d::bbox::{build_corners, BoxDimensions};
/// use kitti_fusion_3d::point::Point3;
///
/// let dims = BoxDimensions { h: 1.5, w: 1.6, l: 3.5 };
/// let corners = build_corners(&dims, &Point3::new(0.0, 0.0, 10.0), 0.0);
/// assert_eq!(corners.corners[0].to_array(), [0.8, 0.0, 11.75]);
/// assert_eq!(corners.corners[4].to_array(), [0.8, -1.5, 11.75]);
/// ```
pub fn build_corners(
    dimensions: &BoxDimensions,
    center: &Point3<RectCameraFrame>,
    yaw: f64,
) -> OrientedBox {
    let hw = dimensions.w / 2.0;
    let hl = dimensions.l / 2.0;
    let footprint = [(hw, hl), (-hw, hl), (-hw, -hl), (hw, -hl)];

    let origin = center.to_dvec3();
    let mut corners = [Point3::default(); 8];
    for (i, (x, z)) in footprint.into_iter().enumerate() {
        for (face, y) in [(0, 0.0), (4, -dimensions.h)] {
            let rotated = rotate_yaw(DVec3::new(x, y, z), yaw);
            corners[face + i] = (origin + rotated).into();
        }
    }

    OrientedBox { corners }
}
