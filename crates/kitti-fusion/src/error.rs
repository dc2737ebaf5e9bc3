/// An error type for the fusion stages.
#[derive(thiserror::Error, Debug)]
pub enum FusionError {
    /// The cloud and its projection do not describe the same points.
    #[error("Point cloud has {0} points but {1} projections")]
    LengthMismatch(usize, usize),

    /// Error while accessing an image.
    #[error("Image error. {0}")]
    ImageError(#[from] kitti_fusion_image::ImageError),

    /// An output port failed to publish a product.
    #[error("Failed to publish `{product}`. {reason}")]
    PublishError {
        /// The product being published.
        product: &'static str,
        /// Why publishing failed.
        reason: String,
    },
}
