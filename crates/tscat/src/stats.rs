use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tscat_catalog::{CoverageCounts, CoverageReport, LoadOptions};

use crate::error::{Result, TscatError};
use crate::util::{OutputFormat, load_catalog, write_json};

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    /// Catalog to summarize.
    pub file: PathBuf,

    /// Only report this context.
    #[arg(long, short = 'c')]
    pub context: Option<String>,

    /// Count unfinished translations with text as untranslated.
    #[arg(long)]
    pub finished_only: bool,
}

pub fn run_stats(args: StatsArgs, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let options = LoadOptions::new().include_unfinished(!args.finished_only);
    let (catalog, _) = load_catalog(&args.file, &options)?;
    let mut report = catalog.coverage_report();

    if let Some(name) = &args.context {
        report.contexts.retain(|ctx| &ctx.context == name);
        let Some(only) = report.contexts.first() else {
            return Err(TscatError::invalid(format!("no context named '{name}'")));
        };
        report.overall = only.counts.clone();
    }

    match format {
        OutputFormat::Json => write_json(out, &report),
        OutputFormat::Text => write_table(out, &report),
    }
}

fn write_table(out: &mut impl Write, report: &CoverageReport) -> Result<()> {
    let width = report
        .contexts
        .iter()
        .map(|ctx| ctx.context.chars().count())
        .max()
        .unwrap_or(0)
        .max("context".len());

    writeln!(
        out,
        "{:<width$}  {:>6}  {:>6}  {:>6}  {:>6}  {:>7}  {:>7}  {:>8}",
        "context", "total", "done", "todo", "plural", "flagged", "retired", "complete"
    )?;
    for ctx in &report.contexts {
        row(out, &ctx.context, &ctx.counts, width)?;
    }
    if report.contexts.len() != 1 {
        row(out, "(all)", &report.overall, width)?;
    }
    Ok(())
}

fn row(out: &mut impl Write, label: &str, counts: &CoverageCounts, width: usize) -> Result<()> {
    writeln!(
        out,
        "{:<width$}  {:>6}  {:>6}  {:>6}  {:>6}  {:>7}  {:>7}  {:>7.1}%",
        label,
        counts.total,
        counts.translated,
        counts.untranslated,
        counts.plural,
        counts.flagged,
        counts.retired,
        counts.completion_percent
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;

    const CATALOG: &str = r#"<TS version="2.1" language="fr">
<context>
    <name>Dialog</name>
    <message><source>Yes</source><translation>Oui</translation></message>
    <message><source>No</source><translation type="unfinished"></translation></message>
    <message><source>Later</source><translation type="vanished">Plus tard</translation></message>
</context>
<context>
    <name>Menu</name>
    <message><source>Quit</source><translation type="unfinished">Quitter</translation></message>
</context>
</TS>"#;

    fn write_catalog(dir: &Path) -> PathBuf {
        let path = dir.join("fr.ts");
        fs::write(&path, CATALOG).expect("write catalog");
        path
    }

    fn stats(args: StatsArgs, format: OutputFormat) -> Result<String> {
        let mut out = Vec::new();
        run_stats(args, format, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn table_lists_contexts_and_total() {
        let temp = tempdir().expect("tempdir");
        let text = stats(
            StatsArgs {
                file: write_catalog(temp.path()),
                context: None,
                finished_only: false,
            },
            OutputFormat::Text,
        )
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4, "{text}");
        assert!(lines[0].starts_with("context"));
        assert!(lines[1].starts_with("Dialog"));
        assert!(lines[1].ends_with("50.0%"));
        assert!(lines[2].starts_with("Menu"));
        assert!(lines[2].ends_with("100.0%"));
        assert!(lines[3].starts_with("(all)"));
    }

    #[test]
    fn finished_only_discounts_unfinished_text() {
        let temp = tempdir().expect("tempdir");
        let payload: serde_json::Value = serde_json::from_str(
            &stats(
                StatsArgs {
                    file: write_catalog(temp.path()),
                    context: None,
                    finished_only: true,
                },
                OutputFormat::Json,
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(payload["overall"]["total"], 3);
        assert_eq!(payload["overall"]["translated"], 1);
        assert_eq!(payload["overall"]["retired"], 1);
        assert_eq!(payload["contexts"][1]["context"], "Menu");
        assert_eq!(payload["contexts"][1]["untranslated"], 1);
    }

    #[test]
    fn single_context_filter() {
        let temp = tempdir().expect("tempdir");
        let payload: serde_json::Value = serde_json::from_str(
            &stats(
                StatsArgs {
                    file: write_catalog(temp.path()),
                    context: Some("Menu".to_string()),
                    finished_only: false,
                },
                OutputFormat::Json,
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(payload["contexts"].as_array().map(Vec::len), Some(1));
        assert_eq!(payload["overall"]["total"], 1);
    }

    #[test]
    fn unknown_context_is_invalid_argument() {
        let temp = tempdir().expect("tempdir");
        let error = stats(
            StatsArgs {
                file: write_catalog(temp.path()),
                context: Some("Nope".to_string()),
                finished_only: false,
            },
            OutputFormat::Text,
        )
        .expect_err("unknown context");
        assert!(matches!(error, TscatError::InvalidArgument { .. }));
    }
}
