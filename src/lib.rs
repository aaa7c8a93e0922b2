use std::fs;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use tracing::info;

mod config;
mod filter;

pub use config::FilterConfig;
pub use filter::{
    classify, extract_name, filter_lines, manifest_lines, normalize, ExclusionSet, LineKind,
    ManifestLines,
};

/// The table we read in a TOML config, i.e. `tool.requirements-filter`
pub const CONFIG_KEY: &str = "requirements-filter";
/// The parent table of [`CONFIG_KEY`] in a pyproject.toml
pub const TOOL_KEY: &str = "tool";
/// The name of our binary
pub const SELF_NAME: &str = "requirements-filter";
/// Lines starting with this (after trimming) are comments
pub const COMMENT_PREFIX: &str = "#";
/// Start of an extras qualifier, e.g. `requests[security]`
pub const EXTRAS_DELIMITER: char = '[';
/// Separates the name from an exact version pin
pub const VERSION_PIN: &str = "==";
/// Separates the name from a direct reference URL
pub const URL_DELIMITER: char = '@';

/// Drop packages from a requirements manifest, printing the remaining lines
/// verbatim and in their original order.
#[derive(Parser, Debug, Clone)]
#[command(name = SELF_NAME, author, version, about, long_about = None)]
pub struct Args {
    /// Path to the upstream requirements file
    #[arg(long, value_name = "PATH")]
    pub input: Utf8PathBuf,

    /// Package names (case-insensitive, extras ignored) to remove
    #[arg(long, num_args = 0.., value_name = "NAME")]
    pub exclude: Vec<String>,

    /// TOML file with a `[tool.requirements-filter]` table listing more names
    /// to exclude
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Log more to stderr; may be given twice
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Build the exclusion set from the command line and the config file.
    pub fn exclusions(&self, config: &FilterConfig) -> ExclusionSet {
        self.exclude.iter().chain(config.exclude.iter()).collect()
    }
}

/// Counts from a single filtering pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub retained: usize,
    pub excluded: usize,
}

/// Read the whole manifest at `path`.
///
/// Fails with an [`io::ErrorKind::NotFound`] error if `path` is not a
/// regular file.
pub fn read_manifest(path: &Utf8Path) -> Result<String> {
    if !path.is_file() {
        return Err(anyhow::Error::new(io::Error::from(io::ErrorKind::NotFound))
            .context(format!("Could not locate requirements file: {path}")));
    }
    fs::read_to_string(path).with_context(|| format!("Reading {path}"))
}

/// Write every line of `manifest` that survives `exclusions` to `out`, one per
/// line.
pub fn write_filtered<W: Write>(
    mut out: W,
    manifest: &str,
    exclusions: &ExclusionSet,
) -> Result<FilterSummary> {
    let mut summary = FilterSummary::default();
    for line in filter_lines(manifest_lines(manifest), exclusions) {
        writeln!(out, "{line}").context("Writing output")?;
        summary.retained += 1;
    }
    summary.excluded = manifest_lines(manifest).count() - summary.retained;
    Ok(summary)
}

/// Filter `args.input` and print the result to stdout.
pub fn run(args: Args) -> Result<()> {
    // Read the input first so that nothing is printed if it is missing.
    let manifest = read_manifest(&args.input)?;
    let config = match args.config.as_deref() {
        Some(path) => FilterConfig::load(path)?,
        None => FilterConfig::default(),
    };
    let exclusions = args.exclusions(&config);
    info!("Excluding {} package name(s)", exclusions.len());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = write_filtered(&mut out, &manifest, &exclusions)?;
    out.flush().context("Writing output")?;
    info!(
        "Retained {} line(s), excluded {} from {}",
        summary.retained, summary.excluded, args.input
    );
    Ok(())
}
