use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tscat_catalog::LoadOptions;
use tscat_catalog::ts::write_document;

use crate::error::{Result, TscatError};
use crate::util::{OutputFormat, load_catalog, write_json};

#[derive(Debug, Clone, Args)]
pub struct NormalizeArgs {
    /// Catalog to rewrite.
    pub file: PathBuf,

    /// Destination file; stdout when omitted.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Leave out obsolete and vanished entries.
    #[arg(long)]
    pub drop_obsolete: bool,
}

#[derive(Debug, Serialize)]
pub struct NormalizeSummary {
    pub status: &'static str,
    pub file: String,
    pub output: String,
    pub entries: usize,
    pub merged: usize,
    pub skipped: usize,
    pub dropped: usize,
}

/// Load a catalog and write it back in canonical layout.
///
/// Duplicates are merged and messages without a source are dropped, so the
/// output reloads without diagnostics of either kind.
pub fn run_normalize(args: NormalizeArgs, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    if format == OutputFormat::Json && args.output.is_none() {
        return Err(TscatError::invalid(
            "--json needs --output, stdout carries the catalog",
        ));
    }

    let (catalog, report) = load_catalog(&args.file, &LoadOptions::default())?;
    let mut document = catalog.to_document();
    let before = document.message_count();
    if args.drop_obsolete {
        for context in &mut document.contexts {
            context.messages.retain(|msg| !msg.state.is_retired());
        }
        document.contexts.retain(|context| !context.messages.is_empty());
    }
    let entries = document.message_count();
    let dropped = before - entries;
    let text = write_document(&document);

    let Some(output) = args.output else {
        out.write_all(text.as_bytes())?;
        return Ok(());
    };
    fs::write(&output, text)?;
    tracing::info!(output = %output.display(), entries, dropped, "catalog normalized");

    if format == OutputFormat::Json {
        write_json(
            out,
            &NormalizeSummary {
                status: "ok",
                file: args.file.display().to_string(),
                output: output.display().to_string(),
                entries,
                merged: report.merged,
                skipped: report.skipped,
                dropped,
            },
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use tscat_catalog::Catalog;

    use super::*;

    const MESSY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TS version="2.1" language="de_DE"><context><name>QObject</name>
<message><location filename="linux/report_linux.cpp" line="19"/><source>Error</source><translation type="unfinished"></translation></message>
<message><location filename="win32/report_win32.cpp" line="20"/><source>Error</source><translation>Fehler</translation></message>
<message><source>Gone</source><translation type="obsolete">Weg</translation></message>
</context><context><name>Old</name>
<message><source>Stale</source><translation type="vanished">Alt</translation></message>
</context></TS>"#;

    #[test]
    fn normalizes_to_stdout() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("de.ts");
        fs::write(&path, MESSY).expect("write catalog");

        let mut out = Vec::new();
        run_normalize(
            NormalizeArgs {
                file: path,
                output: None,
                drop_obsolete: false,
            },
            OutputFormat::Text,
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n"));
        assert!(text.contains(
            "        <location filename=\"linux/report_linux.cpp\" line=\"19\"/>\n        <location filename=\"win32/report_win32.cpp\" line=\"20\"/>\n"
        ));
        assert!(text.contains("<translation>Fehler</translation>"));

        let (catalog, report) = Catalog::parse(&text, &LoadOptions::default()).unwrap();
        assert_eq!(report.merged, 0);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn drop_obsolete_writes_file_and_summary() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("de.ts");
        let output = temp.path().join("de.normalized.ts");
        fs::write(&path, MESSY).expect("write catalog");

        let mut out = Vec::new();
        run_normalize(
            NormalizeArgs {
                file: path,
                output: Some(output.clone()),
                drop_obsolete: true,
            },
            OutputFormat::Json,
            &mut out,
        )
        .unwrap();

        let payload: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["entries"], 1);
        assert_eq!(payload["dropped"], 2);
        assert_eq!(payload["merged"], 1);

        let written = fs::read_to_string(&output).expect("read output");
        let catalog = Catalog::load(&written).unwrap();
        assert_eq!(catalog.contexts(), vec!["QObject"]);
        assert_eq!(catalog.resolve("QObject", "Error", None), "Fehler");
    }

    #[test]
    fn json_without_output_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let error = run_normalize(
            NormalizeArgs {
                file: temp.path().join("unused.ts"),
                output: None,
                drop_obsolete: false,
            },
            OutputFormat::Json,
            &mut Vec::new(),
        )
        .expect_err("json needs a file");
        assert!(matches!(error, TscatError::InvalidArgument { .. }));
    }
}
