use std::marker::PhantomData;

use glam::{DVec3, DVec4};

use crate::projection::PROJECTION_EPSILON;

/// A named 3D reference frame.
///
/// Frames are zero-sized marker types. Every point and transform carries its frame as a
/// type parameter so that points expressed in different frames cannot be mixed.
pub trait Frame: Copy + Clone + std::fmt::Debug + Default + PartialEq + 'static {
    /// Human readable name of the frame.
    const NAME: &'static str;
}

/// Native frame of the range sensor (KITTI velodyne).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SensorFrame;

impl Frame for SensorFrame {
    const NAME: &'static str = "velodyne";
}

/// Frame of the reference camera after rectification (KITTI `R0_rect` applied).
///
/// x points right, y points down and z points forward out of the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RectCameraFrame;

impl Frame for RectCameraFrame {
    const NAME: &'static str = "rect_camera";
}

/// A 3D point with double precision coordinates expressed in frame `F`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3<F> {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate
    pub z: f64,
    frame: PhantomData<F>,
}

impl<F: Frame> Point3<F> {
    /// Create a new point from its coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            frame: PhantomData,
        }
    }

    /// Create a new point from an array of 3 values.
    pub fn from_array(array: [f64; 3]) -> Self {
        Self::new(array[0], array[1], array[2])
    }

    /// Return the coordinates as an array.
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Return the coordinates as a glam vector.
    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Return the homogeneous form `[x, y, z, 1]` of the point.
    pub fn to_homogeneous(&self) -> HomogeneousPoint<F> {
        HomogeneousPoint {
            coords: DVec4::new(self.x, self.y, self.z, 1.0),
            frame: PhantomData,
        }
    }

    /// Create a point from its homogeneous form by dividing through `w`.
    ///
    /// Returns `None` for points at or near infinity, `|w| <= PROJECTION_EPSILON`.
    pub fn from_homogeneous(point: &HomogeneousPoint<F>) -> Option<Self> {
        let h = point.coords;
        if h.w.abs() <= PROJECTION_EPSILON {
            return None;
        }
        Some(Self::new(h.x / h.w, h.y / h.w, h.z / h.w))
    }

    /// Euclidean distance from the frame origin.
    pub fn norm(&self) -> f64 {
        self.to_dvec3().length()
    }

    /// Euclidean distance to another point of the same frame.
    ///
    /// Example:
    /// ```
    /// use kitti_fusion_3d::point::{Point3, SensorFrame};
    ///
    /// let a = Point3::<SensorFrame>::new(1.0, 2.0, 3.0);
    /// let b = Point3::<SensorFrame>::new(4.0, 6.0, 3.0);
    /// assert_eq!(a.distance(&b), 5.0);
    /// ```
    pub fn distance(&self, other: &Self) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// Name of the frame the point is expressed in.
    pub fn frame_name(&self) -> &'static str {
        F::NAME
    }
}

impl<F: Frame> From<DVec3> for Point3<F> {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// A point in homogeneous coordinates, the input of linear transform application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomogeneousPoint<F> {
    coords: DVec4,
    frame: PhantomData<F>,
}

impl<F: Frame> HomogeneousPoint<F> {
    /// The raw 4-vector.
    pub fn coords(&self) -> DVec4 {
        self.coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_from_array() {
        let p = Point3::<SensorFrame>::from_array([1.0, 2.0, 3.0]);
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, 2.0);
        assert_eq!(p.z, 3.0);
        assert_eq!(p.to_array(), [1.0, 2.0, 3.0]);
        assert_eq!(p.frame_name(), "velodyne");
    }

    #[test]
    fn test_point_homogeneous() {
        let p = Point3::<RectCameraFrame>::new(1.0, -2.0, 3.0);
        assert_eq!(p.to_homogeneous().coords(), DVec4::new(1.0, -2.0, 3.0, 1.0));
        assert_eq!(Point3::from_homogeneous(&p.to_homogeneous()), Some(p));
    }

    #[test]
    fn test_point_from_degenerate_homogeneous() {
        let homogeneous = |w| HomogeneousPoint::<SensorFrame> {
            coords: DVec4::new(2.0, 4.0, 6.0, w),
            frame: PhantomData,
        };
        assert_eq!(Point3::from_homogeneous(&homogeneous(0.0)), None);
        assert_eq!(Point3::from_homogeneous(&homogeneous(1e-9)), None);
        assert_eq!(Point3::from_homogeneous(&homogeneous(-1e-7)), None);
        assert_eq!(
            Point3::from_homogeneous(&homogeneous(-2.0)),
            Some(Point3::new(-1.0, -2.0, -3.0))
        );
    }

    #[test]
    fn test_point_norm() {
        let p = Point3::<SensorFrame>::new(3.0, 4.0, 0.0);
        assert_eq!(p.norm(), 5.0);
    }
}
