use std::io;

use clap::{Parser, Subcommand};

use crate::check::{CheckArgs, run_check};
use crate::error::Result;
use crate::normalize::{NormalizeArgs, run_normalize};
use crate::resolve::{ResolveArgs, run_resolve};
use crate::stats::{StatsArgs, run_stats};
use crate::util::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "tscat",
    about = "Validate, query, and normalize Qt .ts translation catalogs",
    version
)]
pub struct Cli {
    /// Log filter when TSCAT_LOG is unset (e.g. `info`, `tscat_catalog=debug`).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Print machine-readable JSON on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a catalog and report diagnostics.
    Check(CheckArgs),

    /// Look up the display string for one key.
    Resolve(ResolveArgs),

    /// Translation coverage per context.
    Stats(StatsArgs),

    /// Rewrite a catalog in canonical layout.
    Normalize(NormalizeArgs),
}

pub fn run(cli: Cli) -> Result<()> {
    crate::logging::init(&cli.log_level);
    let format = OutputFormat::from_json_flag(cli.json);
    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Check(args) => run_check(args, format, &mut out),
        Commands::Resolve(args) => run_resolve(args, format, &mut out),
        Commands::Stats(args) => run_stats(args, format, &mut out),
        Commands::Normalize(args) => run_normalize(args, format, &mut out),
    }
}
