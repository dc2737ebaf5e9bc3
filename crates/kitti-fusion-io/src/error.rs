/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] kitti_fusion_image::ImageError),

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),

    /// Error to decode the PNG image.
    #[error("Failed to decode the png image. {0}")]
    PngDecodeError(String),

    /// The velodyne file is not made of whole `x y z reflectance` records.
    #[error("Velodyne file of {0} bytes is not a multiple of 16 bytes")]
    InvalidVelodyneLength(usize),

    /// A required calibration entry is absent.
    #[error("Missing calibration entry: {0}")]
    MissingCalibrationKey(&'static str),

    /// A calibration entry could not be parsed.
    #[error("Malformed calibration entry `{key}`: {reason}")]
    MalformedCalibration {
        /// The entry name.
        key: String,
        /// What went wrong.
        reason: String,
    },
}
