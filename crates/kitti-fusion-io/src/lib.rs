#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access, decoding failures
/// and format-specific errors.
pub mod error;

/// Calibration files (`calib/XXXXXX.txt`).
pub mod calib;

/// Label files (`label_2/XXXXXX.txt`).
///
/// Malformed lines are reported per line instead of failing the whole file.
pub mod label;

/// PNG image encoding and decoding.
pub mod png;

/// Velodyne scans (`velodyne/XXXXXX.bin`).
pub mod velodyne;

pub use crate::error::IoError;
