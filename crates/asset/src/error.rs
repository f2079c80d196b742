use std::io;

use thiserror::Error;

/// Recoverable asset failures. The caller decides whether to retry, fall back
/// to another asset or give up.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    Missing(String),
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

impl AssetError {
    pub fn is_missing(&self) -> bool {
        matches!(self, AssetError::Missing(_))
    }

    pub(crate) fn io(path: &str, source: io::Error) -> Self {
        AssetError::Io {
            path: path.to_owned(),
            source,
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;
