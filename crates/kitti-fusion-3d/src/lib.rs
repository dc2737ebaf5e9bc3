#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Oriented 3D boxes.
pub mod bbox;

/// KITTI calibration chain.
pub mod calibration;

/// Point cloud outlier removal.
pub mod filter;

/// Object annotations.
pub mod label;

/// Linear algebra utilities.
pub mod linalg;

/// Frames and points.
pub mod point;

/// Colored point clouds.
pub mod pointcloud;

/// Projection of sensor points onto the image plane.
pub mod projection;

/// 3D transforms algorithms.
pub mod transforms;
