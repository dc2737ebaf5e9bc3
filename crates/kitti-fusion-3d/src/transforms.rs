use glam::{DMat3, DQuat, DVec3};

/// An orientation quaternion `{x, y, z, w}`, e.g. for a marker pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    /// x component
    pub x: f64,
    /// y component
    pub y: f64,
    /// z component
    pub z: f64,
    /// w (scalar) component
    pub w: f64,
}

impl From<DQuat> for Quaternion {
    fn from(q: DQuat) -> Self {
        Self {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
    }
}

/// Compute the rotation matrix about the camera vertical (y) axis.
///
/// The rotation is right-handed: `x' = x·cosθ + z·sinθ`, `y' = y`,
/// `z' = -x·sinθ + z·cosθ`.
///
/// # Arguments
///
/// * `yaw` - The rotation angle in radians.
///
/// Example:
///
/// ```
/// use kitti_fusion_3d::transforms::yaw_rotation_matrix;
///
/// let r = yaw_rotation_matrix(std::f64::consts::FRAC_PI_2);
/// let p = r * glam::DVec3::new(1.0, 0.0, 0.0);
/// assert!((p.z + 1.0).abs() < 1e-12);
/// ```
pub fn yaw_rotation_matrix(yaw: f64) -> DMat3 {
    DMat3::from_rotation_y(yaw)
}

/// Rotate a vector about the camera vertical axis by `yaw` radians.
pub fn rotate_yaw(v: DVec3, yaw: f64) -> DVec3 {
    let (s, c) = yaw.sin_cos();
    DVec3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

/// Convert a single yaw angle into an orientation quaternion.
///
/// This is a single axis-angle conversion about the camera vertical axis, not a general
/// Euler composition. The result is `(0, sin θ/2, 0, cos θ/2)`, consistent with
/// [`yaw_rotation_matrix`].
pub fn yaw_to_quaternion(yaw: f64) -> Quaternion {
    DQuat::from_rotation_y(yaw).into()
}
