use crate::{
    linalg::{ProjectionMatrix, RigidTransform},
    point::{RectCameraFrame, SensorFrame},
};

/// Marker frame of the unrectified reference camera (`cam0`).
///
/// Only used to type the intermediate step between `Tr_velo_to_cam` and `R0_rect`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReferenceCameraFrame;

impl crate::point::Frame for ReferenceCameraFrame {
    const NAME: &'static str = "reference_camera";
}

/// Marker frame of the inertial unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImuFrame;

impl crate::point::Frame for ImuFrame {
    const NAME: &'static str = "imu";
}

/// The calibration of a KITTI object-detection frame (`calib/XXXXXX.txt`).
#[derive(Clone, Debug, PartialEq)]
pub struct KittiCalibration {
    /// Projection matrices of the four cameras, `P0..P3`, in the rectified frame.
    pub projections: [ProjectionMatrix<RectCameraFrame>; 4],
    /// Rectifying rotation of the reference camera.
    pub r0_rect: RigidTransform<ReferenceCameraFrame, RectCameraFrame>,
    /// Rigid transform from the velodyne to the reference camera.
    pub tr_velo_to_cam: RigidTransform<SensorFrame, ReferenceCameraFrame>,
    /// Rigid transform from the inertial unit to the velodyne.
    pub tr_imu_to_velo: RigidTransform<ImuFrame, SensorFrame>,
}

impl KittiCalibration {
    /// Index of the left color camera in [`KittiCalibration::projections`].
    pub const LEFT_COLOR_CAMERA: usize = 2;

    /// The full sensor to rectified camera transform, `R0_rect · Tr_velo_to_cam`.
    pub fn sensor_to_rect(&self) -> RigidTransform<SensorFrame, RectCameraFrame> {
        self.tr_velo_to_cam.then(&self.r0_rect)
    }

    /// The projection of the left color camera, `P2`.
    pub fn rect_to_image(&self) -> ProjectionMatrix<RectCameraFrame> {
        self.projections[Self::LEFT_COLOR_CAMERA]
    }
}
