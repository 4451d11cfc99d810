// One error type for the whole tool.
// Every variant states *where* things went wrong.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Three of the four corners sit on one line (or two coincide).
    #[error("degenerate quadrilateral: {0}")]
    DegenerateQuad(String),

    #[error("homography system is singular")]
    SingularHomography,

    #[error("corners are not a convex quad in TL -> TR -> BR -> BL order")]
    UnorderedCorners,

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
