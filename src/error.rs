//! Error type for everything that touches the filesystem
//!
//! The rasterizer itself has no error channel: bad arguments are programming
//! errors and panic, degenerate geometry is skipped silently.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode or encode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("config serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("OBJ line {line}: {message}")]
    Obj { line: usize, message: String },

    #[error("model has no faces")]
    EmptyModel,

    #[error("images with {0} channels cannot be saved")]
    UnsupportedChannels(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
