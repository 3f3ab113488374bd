//! Command-line interface for inspecting OpenStreetMap PBF datasets.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use osmgraph_core::{DEFAULT_CHECKPOINT_INTERVAL, DecodeOptions, TagFilter};
use std::io::Write;

mod error;
mod render;
mod summary;

pub use error::CliError;

use render::RenderArgs;
use summary::SummaryArgs;

pub(crate) const ARG_OSM_PBF: &str = "osm-pbf";
pub(crate) const ARG_KEEP_TAGS: &str = "keep-tags";
pub(crate) const ARG_STREAM: &str = "stream";
pub(crate) const ARG_CHECKPOINT_INTERVAL: &str = "checkpoint-interval";
pub(crate) const ENV_SUMMARY_OSM_PBF: &str = "OSMGRAPH_CMDS_SUMMARY_OSM_PBF";
pub(crate) const ENV_RENDER_OSM_PBF: &str = "OSMGRAPH_CMDS_RENDER_OSM_PBF";

/// Run the osmgraph CLI with the current process arguments and environment.
///
/// Command output goes to stdout.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// dataset cannot be loaded, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli.command, &mut stdout)
}

fn run_with(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Summary(args) => summary::run_summary_with(args, writer),
        Command::Render(args) => render::run_render_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "osmgraph",
    about = "Decode OpenStreetMap PBF files into a resolved entity graph",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report entity counts and bounds as JSON.
    Summary(SummaryArgs),
    /// Render the resolved graph as OSM XML.
    Render(RenderArgs),
}

/// Build decode options from the shared command flags.
pub(crate) fn decode_options(
    keep_tags: Option<Vec<String>>,
    checkpoint_interval: Option<u64>,
) -> DecodeOptions {
    let tag_filter = match keep_tags {
        Some(keys) if !keys.is_empty() => TagFilter::keys(keys),
        _ => TagFilter::All,
    };
    DecodeOptions {
        tag_filter,
        checkpoint_interval: checkpoint_interval.unwrap_or(DEFAULT_CHECKPOINT_INTERVAL),
        ..DecodeOptions::default()
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        })
    }
}

pub(crate) fn write_line(writer: &mut dyn Write, payload: &[u8]) -> Result<(), CliError> {
    writer.write_all(payload).map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
