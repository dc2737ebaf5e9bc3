#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Top-down rendering of colored clouds and label footprints.
pub mod birdview;

/// Stage settings loaded from JSON.
pub mod config;

/// Error types for the fusion stages.
pub mod error;

/// Colorization of sensor points from camera images and masks.
pub mod fuser;

/// 3D wireframes of labeled objects.
pub mod markers;

/// The per-frame pipeline and its output port.
pub mod pipeline;

pub use crate::error::FusionError;

#[doc(inline)]
pub use kitti_fusion_3d as k3d;

#[doc(inline)]
pub use kitti_fusion_image as image;

#[doc(inline)]
pub use kitti_fusion_imgproc as imgproc;

#[doc(inline)]
pub use kitti_fusion_io as io;
