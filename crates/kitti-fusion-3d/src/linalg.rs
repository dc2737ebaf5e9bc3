use std::marker::PhantomData;

use glam::{DMat4, DVec4};

use crate::point::{Frame, HomogeneousPoint, Point3};

/// A 4x4 homogeneous transform mapping points from frame `Src` to frame `Dst`.
///
/// The transform is immutable once built. The naming follows the `dst_T_src`
/// convention: `RigidTransform<SensorFrame, RectCameraFrame>` maps sensor points
/// into the rectified camera frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidTransform<Src, Dst> {
    matrix: DMat4,
    frames: PhantomData<(Src, Dst)>,
}

impl<Src: Frame, Dst: Frame> RigidTransform<Src, Dst> {
    /// The identity transform.
    pub fn identity() -> Self {
        Self::from_mat4(DMat4::IDENTITY)
    }

    /// Create a transform from a glam matrix.
    pub fn from_mat4(matrix: DMat4) -> Self {
        Self {
            matrix,
            frames: PhantomData,
        }
    }

    /// Create a transform from a row-major 4x4 matrix.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        // glam takes columns, so the row-major input is the transpose
        Self::from_mat4(DMat4::from_cols_array_2d(&rows).transpose())
    }

    /// Create a transform from a row-major 3x4 `[R|t]` block, e.g. KITTI `Tr_velo_to_cam`.
    pub fn from_rows_3x4(rows: [[f64; 4]; 3]) -> Self {
        Self::from_rows([rows[0], rows[1], rows[2], [0.0, 0.0, 0.0, 1.0]])
    }

    /// Create a pure rotation from a row-major 3x3 matrix, e.g. KITTI `R0_rect`.
    pub fn from_rotation(rotation: [[f64; 3]; 3]) -> Self {
        let r = rotation;
        Self::from_rows([
            [r[0][0], r[0][1], r[0][2], 0.0],
            [r[1][0], r[1][1], r[1][2], 0.0],
            [r[2][0], r[2][1], r[2][2], 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &DMat4 {
        &self.matrix
    }

    /// Apply the transform to a homogeneous point.
    pub fn apply_homogeneous(&self, point: &HomogeneousPoint<Src>) -> Point3<Dst> {
        let p = self.matrix * point.coords();
        Point3::new(p.x, p.y, p.z)
    }

    /// Apply the transform to a single point.
    pub fn apply(&self, point: &Point3<Src>) -> Point3<Dst> {
        self.apply_homogeneous(&point.to_homogeneous())
    }

    /// Chain this transform with `next`, giving a transform from `Src` to `Next`.
    ///
    /// The result applies `self` first, then `next`.
    pub fn then<Next: Frame>(
        &self,
        next: &RigidTransform<Dst, Next>,
    ) -> RigidTransform<Src, Next> {
        RigidTransform::from_mat4(next.matrix * self.matrix)
    }
}

/// A 3x4 projection matrix mapping points of frame `Src` to homogeneous pixel coordinates.
///
/// Applying it to a point yields `(su, sv, s)`; the caller performs the perspective divide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionMatrix<Src> {
    rows: [DVec4; 3],
    frame: PhantomData<Src>,
}

impl<Src: Frame> ProjectionMatrix<Src> {
    /// Create a projection from a row-major 3x4 matrix, e.g. KITTI `P2`.
    pub fn from_rows(rows: [[f64; 4]; 3]) -> Self {
        Self {
            rows: [
                DVec4::from_array(rows[0]),
                DVec4::from_array(rows[1]),
                DVec4::from_array(rows[2]),
            ],
            frame: PhantomData,
        }
    }

    /// Focal lengths `(fx, fy)` of the projection.
    pub fn focal_length(&self) -> (f64, f64) {
        (self.rows[0].x, self.rows[1].y)
    }

    /// Principal point `(cx, cy)` of the projection.
    pub fn principal_point(&self) -> (f64, f64) {
        (self.rows[0].z, self.rows[1].z)
    }

    /// Apply the projection to a homogeneous point, returning `[su, sv, s]`.
    pub fn apply_homogeneous(&self, point: &HomogeneousPoint<Src>) -> [f64; 3] {
        let h = point.coords();
        [self.rows[0].dot(h), self.rows[1].dot(h), self.rows[2].dot(h)]
    }

    /// Apply the projection to a point, returning `[su, sv, s]`.
    pub fn apply(&self, point: &Point3<Src>) -> [f64; 3] {
        self.apply_homogeneous(&point.to_homogeneous())
    }
}

/// Transform a set of points from frame `Src` to frame `Dst`.
///
/// # Arguments
///
/// * `src_points` - A set of points to be transformed.
/// * `dst_t_src` - The transform to apply.
///
/// # Returns
///
/// The transformed points, in input order.
///
/// Example:
///
/// ```
/// use kitti_fusion_3d::linalg::{transform_points, RigidTransform};
/// use kitti_fusion_3d::point::{Point3, RectCameraFrame, SensorFrame};
///
/// let src_points = vec![Point3::<SensorFrame>::new(2.0, 2.0, 2.0)];
/// let dst_t_src = RigidTransform::<SensorFrame, RectCameraFrame>::identity();
/// let dst_points = transform_points(&src_points, &dst_t_src);
/// assert_eq!(dst_points[0].to_array(), [2.0, 2.0, 2.0]);
/// ```
pub fn transform_points<Src: Frame, Dst: Frame>(
    src_points: &[Point3<Src>],
    dst_t_src: &RigidTransform<Src, Dst>,
) -> Vec<Point3<Dst>> {
    src_points.iter().map(|p| dst_t_src.apply(p)).collect()
}
