use thiserror::Error;

/// Machine-checkable category of a [`SceneError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DecodeFailure,
    OutOfBounds,
    InvalidResolution,
    NotReady,
    InvalidParameter,
    /// Missing bands, zero dimensions, mismatched band lengths
    Structural,
    Encode,
    Io,
}

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode raster: {0}")]
    DecodeFailure(String),

    #[error("Position lat={latitude}, lon={longitude} lies outside the raster's bounding box")]
    OutOfBounds { latitude: f64, longitude: f64 },

    #[error("Invalid output resolution: width={0}, height={1}")]
    InvalidResolution(u32, u32),

    #[error("Scene not ready: {0}")]
    NotReady(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Raster has no bands")]
    MissingBands,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SceneError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SceneError::DecodeFailure(_) | SceneError::UnsupportedFormat(_) => {
                ErrorKind::DecodeFailure
            }
            SceneError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            SceneError::InvalidResolution(_, _) => ErrorKind::InvalidResolution,
            SceneError::NotReady(_) => ErrorKind::NotReady,
            SceneError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            SceneError::InvalidDimensions(_, _) | SceneError::MissingBands => {
                ErrorKind::Structural
            }
            SceneError::EncodeError(_) => ErrorKind::Encode,
            SceneError::InputReadError(_)
            | SceneError::OutputWriteError(_)
            | SceneError::IoError(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, SceneError>;
