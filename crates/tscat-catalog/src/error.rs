use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors from catalog loading and lookup.
///
/// Only structural failures abort a load. Problems confined to a single
/// message are reported as [`Diagnostic`](crate::catalog::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not well-formed or lacks required structure.
    #[error("parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// A lookup was attempted before any catalog was published.
    #[error("catalog not loaded")]
    NotLoaded,

    /// A catalog was already published; the store is read-only.
    #[error("catalog already loaded")]
    AlreadyLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    #[must_use]
    pub fn parse(position: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}
