//! Summary command: counts and bounds of a PBF dataset as JSON.

use std::collections::HashSet;
use std::io::Write;
use std::ops::ControlFlow;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmgraph_core::{
    BBox, DecodeOptions, Handler, Node, OsmGraph, PassSummary, ReferenceMode, Relation, Way,
};
use osmgraph_data::{load_osm_pbf, stream_osm_pbf};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CHECKPOINT_INTERVAL, ARG_KEEP_TAGS, ARG_OSM_PBF, ARG_STREAM, CliError, ENV_SUMMARY_OSM_PBF,
    decode_options, require_existing, write_line,
};

/// CLI arguments for the `summary` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "summary",
    long_about = "Decode a PBF file and print entity counts, distinct authors \
                 and the bounding box of every node as JSON. Paths can come \
                 from CLI flags, configuration files, or environment \
                 variables.",
    about = "Summarize an OSM PBF dataset"
)]
#[ortho_config(prefix = "OSMGRAPH")]
pub(crate) struct SummaryArgs {
    /// Path to the OpenStreetMap PBF file.
    #[arg(long = ARG_OSM_PBF, value_name = "path")]
    #[serde(default)]
    pub(crate) osm_pbf: Option<Utf8PathBuf>,
    /// Stream entities through a counting handler instead of building the graph.
    ///
    /// Streamed entities are counted without resolving their references.
    #[arg(long = ARG_STREAM, num_args = 0..=1, default_missing_value = "true", value_name = "bool")]
    #[serde(default)]
    pub(crate) stream: Option<bool>,
    /// Keep only these tag keys (comma separated).
    #[arg(long = ARG_KEEP_TAGS, value_name = "key", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) keep_tags: Option<Vec<String>>,
    /// Primitives between progress checkpoints; 0 disables them.
    #[arg(long = ARG_CHECKPOINT_INTERVAL, value_name = "count")]
    #[serde(default)]
    pub(crate) checkpoint_interval: Option<u64>,
}

impl SummaryArgs {
    pub(crate) fn into_config(self) -> Result<SummaryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SummaryConfig::try_from(merged)
    }
}

/// Resolved `summary` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SummaryConfig {
    pub(crate) osm_pbf: Utf8PathBuf,
    pub(crate) stream: bool,
    pub(crate) options: DecodeOptions,
}

impl TryFrom<SummaryArgs> for SummaryConfig {
    type Error = CliError;

    fn try_from(args: SummaryArgs) -> Result<Self, Self::Error> {
        let osm_pbf = args.osm_pbf.ok_or(CliError::MissingArgument {
            field: ARG_OSM_PBF,
            env: ENV_SUMMARY_OSM_PBF,
        })?;
        let stream = args.stream.unwrap_or(false);
        let mut options = decode_options(args.keep_tags, args.checkpoint_interval);
        if stream {
            // Counting needs no references, so skip the pass-owned index.
            options.references = ReferenceMode::Deferred;
        }
        Ok(Self {
            osm_pbf,
            stream,
            options,
        })
    }
}

/// JSON payload printed by the `summary` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SummaryReport {
    pub(crate) nodes: u64,
    pub(crate) ways: u64,
    pub(crate) relations: u64,
    pub(crate) users: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) skipped: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub(crate) stopped: bool,
    pub(crate) bounds: Option<BBox>,
}

impl SummaryReport {
    fn from_graph(graph: &OsmGraph) -> Self {
        Self {
            nodes: count(graph.nodes.len()),
            ways: count(graph.ways.len()),
            relations: count(graph.relations.len()),
            users: count(graph.users.len()),
            skipped: None,
            stopped: false,
            bounds: non_empty(graph.bounds),
        }
    }

    fn from_pass(summary: &PassSummary, counter: &CountingHandler) -> Self {
        Self {
            nodes: summary.nodes,
            ways: summary.ways,
            relations: summary.relations,
            users: count(counter.users.len()),
            skipped: Some(summary.skipped),
            stopped: summary.stopped,
            bounds: non_empty(summary.bounds),
        }
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

fn non_empty(bounds: BBox) -> Option<BBox> {
    (!bounds.is_empty()).then_some(bounds)
}

/// Streaming handler that retains only distinct author ids.
#[derive(Debug, Default)]
pub(crate) struct CountingHandler {
    users: HashSet<u32>,
}

impl Handler for CountingHandler {
    fn read_node(&mut self, node: Arc<Node>) -> ControlFlow<()> {
        self.users.insert(node.meta.user.id);
        ControlFlow::Continue(())
    }

    fn read_way(&mut self, way: Arc<Way>) -> ControlFlow<()> {
        self.users.insert(way.meta.user.id);
        ControlFlow::Continue(())
    }

    fn read_relation(&mut self, relation: Arc<Relation>) -> ControlFlow<()> {
        self.users.insert(relation.meta.user.id);
        ControlFlow::Continue(())
    }

    fn read_bounds(&mut self, _bounds: BBox) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

pub(crate) fn run_summary_with(args: SummaryArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.osm_pbf, ARG_OSM_PBF)?;
    let report = summarize(&config)?;
    let payload = serde_json::to_vec_pretty(&report).map_err(CliError::SerializeSummary)?;
    write_line(writer, &payload)
}

pub(crate) fn summarize(config: &SummaryConfig) -> Result<SummaryReport, CliError> {
    let path = config.osm_pbf.as_std_path();
    if config.stream {
        let mut counter = CountingHandler::default();
        let summary = stream_osm_pbf(path, &mut counter, &config.options)?;
        info!(
            "Streamed {} nodes, {} ways and {} relations",
            summary.nodes, summary.ways, summary.relations
        );
        Ok(SummaryReport::from_pass(&summary, &counter))
    } else {
        let graph = load_osm_pbf(path, &config.options)?;
        Ok(SummaryReport::from_graph(&graph))
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SummaryConfig, CliError> {
    let merged = SummaryArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SummaryConfig::try_from(merged)
}
