use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tscat_catalog::LoadOptions;

use crate::error::Result;
use crate::util::{OutputFormat, load_catalog, write_json};

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Catalog to query.
    pub file: PathBuf,

    #[arg(long, short = 'c')]
    pub context: String,

    /// Untranslated source text, exactly as in the catalog.
    #[arg(long, short = 's')]
    pub source: String,

    #[arg(long, short = 'd')]
    pub disambiguation: Option<String>,

    /// Quantity used to pick a plural form.
    #[arg(short = 'n', long = "count", allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Locale for plural selection, overriding the file's `language` attribute.
    #[arg(long)]
    pub locale: Option<String>,

    /// Ignore translations still marked unfinished.
    #[arg(long)]
    pub finished_only: bool,

    /// Also resolve obsolete and vanished entries.
    #[arg(long)]
    pub include_obsolete: bool,
}

#[derive(Debug, Serialize)]
pub struct Resolution<'a> {
    pub context: &'a str,
    pub source: &'a str,
    pub disambiguation: Option<&'a str>,
    pub count: Option<i64>,
    /// Whether the catalog has an entry for the key at all.
    pub known: bool,
    pub text: &'a str,
}

pub fn run_resolve(args: ResolveArgs, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let mut options = LoadOptions::new()
        .include_unfinished(!args.finished_only)
        .include_obsolete(args.include_obsolete);
    if let Some(locale) = &args.locale {
        options = options.with_locale(locale.as_str());
    }
    let (catalog, _) = load_catalog(&args.file, &options)?;

    let disambiguation = args.disambiguation.as_deref();
    let text = catalog.resolve_disambiguated(&args.context, &args.source, disambiguation, args.count);
    let known = catalog
        .entry(&args.context, &args.source, disambiguation)
        .or_else(|| catalog.entry(&args.context, &args.source, None))
        .is_some();
    tracing::debug!(context = %args.context, known, "resolved");

    match format {
        OutputFormat::Json => write_json(
            out,
            &Resolution {
                context: &args.context,
                source: &args.source,
                disambiguation,
                count: args.count,
                known,
                text,
            },
        ),
        OutputFormat::Text => {
            writeln!(out, "{text}")?;
            Ok(())
        }
    }
}
