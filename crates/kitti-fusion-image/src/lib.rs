#![deny(missing_docs)]
//! Image types used to sample camera frames and render fusion outputs.

/// image representation for the fusion pipeline.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
