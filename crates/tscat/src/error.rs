use std::path::{Path, PathBuf};

use thiserror::Error;
use tscat_catalog::CatalogError;

pub type Result<T> = std::result::Result<T, TscatError>;

/// Exit code for a `check --strict` that found warnings.
pub const EXIT_STRICT: i32 = 2;
/// Exit code for a catalog that could not be parsed.
pub const EXIT_PARSE: i32 = 3;

#[derive(Debug, Error)]
pub enum TscatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{}: {warnings} warning(s) in strict mode", path.display())]
    StrictCheckFailed { path: PathBuf, warnings: usize },
}

impl TscatError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StrictCheckFailed { .. } => EXIT_STRICT,
            Self::Load {
                source: CatalogError::Parse { .. },
                ..
            } => EXIT_PARSE,
            _ => 1,
        }
    }

    #[must_use]
    pub fn load(path: &Path, source: CatalogError) -> Self {
        Self::Load {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
