//! Error types emitted by the osmgraph CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osmgraph_data::OsmLoadError;
use thiserror::Error;

/// Errors emitted by the osmgraph CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// Loading or streaming the dataset failed.
    #[error("failed to load OSM data: {0}")]
    Load(#[from] Box<OsmLoadError>),
    /// Serializing the summary failed.
    #[error("failed to serialize summary: {0}")]
    SerializeSummary(#[source] serde_json::Error),
    /// Rendering OSM XML failed.
    #[error("failed to render OSM XML: {0}")]
    RenderXml(#[source] quick_xml::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<OsmLoadError> for CliError {
    fn from(err: OsmLoadError) -> Self {
        Self::Load(Box::new(err))
    }
}
