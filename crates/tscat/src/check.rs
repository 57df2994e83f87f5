use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tscat_catalog::{Diagnostic, LoadOptions};

use crate::error::{Result, TscatError};
use crate::util::{OutputFormat, load_catalog, write_json};

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Catalog to validate.
    pub file: PathBuf,

    /// Locale for plural checks, overriding the file's `language` attribute.
    #[arg(long)]
    pub locale: Option<String>,

    /// Exit with code 2 if any warning is reported.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckSummary<'a> {
    pub status: &'static str,
    pub file: String,
    pub language: Option<&'a str>,
    pub entries: usize,
    pub skipped: usize,
    pub merged: usize,
    pub warnings: usize,
    pub diagnostics: &'a [Diagnostic],
}

pub fn run_check(args: CheckArgs, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let mut options = LoadOptions::new();
    if let Some(locale) = &args.locale {
        options = options.with_locale(locale.as_str());
    }
    let (catalog, report) = load_catalog(&args.file, &options)?;
    let warnings = report.warnings().count();
    let failed = args.strict && warnings > 0;

    match format {
        OutputFormat::Json => {
            let summary = CheckSummary {
                status: if failed { "failed" } else { "ok" },
                file: args.file.display().to_string(),
                language: catalog.language(),
                entries: catalog.len(),
                skipped: report.skipped,
                merged: report.merged,
                warnings,
                diagnostics: &report.diagnostics,
            };
            write_json(out, &summary)?;
        }
        OutputFormat::Text => {
            for diagnostic in &report.diagnostics {
                let level = if diagnostic.is_warning() { "warning" } else { "note" };
                writeln!(out, "{level}: {diagnostic}")?;
            }
            writeln!(
                out,
                "{}: {} entries, {} warning(s), {} merged, {} skipped",
                args.file.display(),
                catalog.len(),
                warnings,
                report.merged,
                report.skipped
            )?;
        }
    }

    if failed {
        return Err(TscatError::StrictCheckFailed {
            path: args.file,
            warnings,
        });
    }
    Ok(())
}
