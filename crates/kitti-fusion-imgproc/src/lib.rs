#![deny(missing_docs)]
//! Image processing operations used to burn fusion results into rasters.

/// Drawing primitives: lines, polylines and circles.
pub mod draw;
