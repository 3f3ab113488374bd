//! End-to-end runs of the `summary` and `render` commands on PBF fixtures.

use super::helpers::{Workspace, output_text};
use super::*;
use crate::render::{RenderArgs, run_render_with};
use crate::summary::{SummaryArgs, run_summary_with};
use osmgraph_core::ResolveError;
use osmgraph_data::OsmLoadError;
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn summary_json(args: SummaryArgs) -> Value {
    let mut buffer = Vec::new();
    run_summary_with(args, &mut buffer).expect("summary succeeds");
    serde_json::from_slice(&buffer).expect("summary is JSON")
}

#[rstest]
fn summarizes_a_materialized_graph(workspace: Workspace) {
    let report = summary_json(SummaryArgs {
        osm_pbf: Some(workspace.fixture("triangle")),
        ..SummaryArgs::default()
    });
    assert_eq!(report["nodes"], 3);
    assert_eq!(report["ways"], 1);
    assert_eq!(report["relations"], 1);
    assert_eq!(report["users"], 2);
    assert!(report.get("skipped").is_none(), "{report}");
    let min_lat = report["bounds"]["lower_left"]["lat"]
        .as_f64()
        .expect("bounds are reported");
    assert!((52.0..52.2).contains(&min_lat), "{report}");
}

#[rstest]
fn summarizes_a_streamed_pass(workspace: Workspace) {
    let report = summary_json(SummaryArgs {
        osm_pbf: Some(workspace.fixture("triangle")),
        stream: Some(true),
        ..SummaryArgs::default()
    });
    assert_eq!(report["nodes"], 3);
    assert_eq!(report["users"], 2);
    assert_eq!(report["skipped"], 1);
    assert!(report.get("stopped").is_none(), "{report}");
}

#[rstest]
fn streamed_summary_counts_without_resolving(workspace: Workspace) {
    let report = summary_json(SummaryArgs {
        osm_pbf: Some(workspace.fixture("dangling")),
        stream: Some(true),
        ..SummaryArgs::default()
    });
    assert_eq!(report["nodes"], 1);
    assert_eq!(report["ways"], 1);
}

#[rstest]
fn renders_escaped_osm_xml(workspace: Workspace) {
    let mut buffer = Vec::new();
    let args = RenderArgs {
        osm_pbf: Some(workspace.fixture("triangle")),
        ..RenderArgs::default()
    };
    run_render_with(args, &mut buffer).expect("render succeeds");
    let xml = output_text(buffer);
    assert!(xml.starts_with("<?xml"), "{xml}");
    assert!(xml.contains(r#"<tag k="name" v="Main St &amp; 1st"/>"#), "{xml}");
    assert!(xml.contains(r#"<member type="node" ref="3" role="stop"/>"#), "{xml}");
    assert!(xml.contains(r#"user="alice""#), "{xml}");
    assert!(xml.ends_with("</osm>\n"), "{xml}");
}

#[rstest]
fn render_honours_keep_tags(workspace: Workspace) {
    let mut buffer = Vec::new();
    let args = RenderArgs {
        osm_pbf: Some(workspace.fixture("triangle")),
        keep_tags: Some(vec!["name".to_owned()]),
        ..RenderArgs::default()
    };
    run_render_with(args, &mut buffer).expect("render succeeds");
    let xml = output_text(buffer);
    assert!(xml.contains(r#"k="name""#), "{xml}");
    assert!(!xml.contains(r#"k="highway""#), "{xml}");
}

#[rstest]
fn missing_dataset_is_reported_before_loading(workspace: Workspace) {
    let missing = workspace.root().join("absent.osm.pbf");
    let mut buffer = Vec::new();
    let args = SummaryArgs {
        osm_pbf: Some(missing),
        ..SummaryArgs::default()
    };
    let err = run_summary_with(args, &mut buffer).expect_err("file is absent");
    assert!(matches!(err, CliError::MissingSourceFile { .. }), "{err:?}");
    assert!(buffer.is_empty());
}

#[rstest]
fn dangling_references_fail_the_command(workspace: Workspace) {
    let mut buffer = Vec::new();
    let args = RenderArgs {
        osm_pbf: Some(workspace.fixture("dangling")),
        ..RenderArgs::default()
    };
    let err = run_render_with(args, &mut buffer).expect_err("way 10 is dangling");
    match err {
        CliError::Load(load) => assert!(
            matches!(
                *load,
                OsmLoadError::Resolve(ResolveError::MissingNodeReference { node_id: 99, .. })
            ),
            "{load:?}"
        ),
        other => panic!("expected a load error, found {other:?}"),
    }
    assert!(buffer.is_empty(), "nothing is written on failure");
}
