use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tscat_catalog::{Catalog, LoadOptions, LoadReport};

use crate::error::{Result, TscatError};

/// How command results are printed on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Load a catalog file, attaching the path to any failure.
pub fn load_catalog(path: &Path, options: &LoadOptions) -> Result<(Catalog, LoadReport)> {
    tracing::debug!(path = %path.display(), "loading catalog");
    Catalog::load_path(path, options).map_err(|source| TscatError::load(path, source))
}

pub fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
