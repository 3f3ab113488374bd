//! Render command: the resolved graph as an OSM XML document.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmgraph_core::DecodeOptions;
use osmgraph_core::xml::OsmXmlWriter;
use osmgraph_data::load_osm_pbf;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CHECKPOINT_INTERVAL, ARG_KEEP_TAGS, ARG_OSM_PBF, CliError, ENV_RENDER_OSM_PBF,
    decode_options, require_existing,
};

/// CLI arguments for the `render` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "render",
    long_about = "Load a PBF file, resolve every reference and print the \
                 graph as an OSM XML document with entities sorted by id.",
    about = "Render an OSM PBF dataset as OSM XML"
)]
#[ortho_config(prefix = "OSMGRAPH")]
pub(crate) struct RenderArgs {
    /// Path to the OpenStreetMap PBF file.
    #[arg(long = ARG_OSM_PBF, value_name = "path")]
    #[serde(default)]
    pub(crate) osm_pbf: Option<Utf8PathBuf>,
    /// Keep only these tag keys (comma separated).
    #[arg(long = ARG_KEEP_TAGS, value_name = "key", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) keep_tags: Option<Vec<String>>,
    /// Primitives between progress checkpoints; 0 disables them.
    #[arg(long = ARG_CHECKPOINT_INTERVAL, value_name = "count")]
    #[serde(default)]
    pub(crate) checkpoint_interval: Option<u64>,
}

impl RenderArgs {
    pub(crate) fn into_config(self) -> Result<RenderConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RenderConfig::try_from(merged)
    }
}

/// Resolved `render` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderConfig {
    pub(crate) osm_pbf: Utf8PathBuf,
    pub(crate) options: DecodeOptions,
}

impl TryFrom<RenderArgs> for RenderConfig {
    type Error = CliError;

    fn try_from(args: RenderArgs) -> Result<Self, Self::Error> {
        let osm_pbf = args.osm_pbf.ok_or(CliError::MissingArgument {
            field: ARG_OSM_PBF,
            env: ENV_RENDER_OSM_PBF,
        })?;
        Ok(Self {
            osm_pbf,
            options: decode_options(args.keep_tags, args.checkpoint_interval),
        })
    }
}

pub(crate) fn run_render_with(args: RenderArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.osm_pbf, ARG_OSM_PBF)?;
    let graph = load_osm_pbf(config.osm_pbf.as_std_path(), &config.options)?;
    let mut xml = OsmXmlWriter::new(&mut *writer);
    xml.write_graph(&graph).map_err(CliError::RenderXml)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}
