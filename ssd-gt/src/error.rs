//! Error types.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The annotation line cannot be turned into a record. The whole batch is
    /// rejected.
    #[error("malformed annotation at line {line_index}: {reason}\n    {content}")]
    MalformedAnnotation {
        line_index: usize,
        content: String,
        reason: String,
    },
    #[error("the default box set is empty")]
    EmptyAnchorSet,
    #[error("image size {width}x{height} must be positive")]
    InvalidImageSize { width: f32, height: f32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to load image '{}'", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    #[error("batch building was cancelled")]
    Cancelled,
}
