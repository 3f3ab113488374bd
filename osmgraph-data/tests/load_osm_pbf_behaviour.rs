//! Behavioural tests for the `load_osm_pbf` entry point.

use osmgraph_core::{DecodeOptions, OsmGraph, ResolveError};
use osmgraph_data::{Origin, OsmLoadError, load_osm_pbf};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::TempPath;

mod support;

use support::{assert_close, decode_fixture};

type LoadOutcome = RefCell<Option<Result<OsmGraph, OsmLoadError>>>;

#[fixture]
fn fixtures_dir() -> PathBuf {
    support::fixtures_dir()
}

enum FixtureTarget {
    Existing(TempPath),
    Missing(PathBuf),
}

impl FixtureTarget {
    fn path(&self) -> &Path {
        match self {
            FixtureTarget::Existing(temp) => temp.as_ref(),
            FixtureTarget::Missing(path) => path.as_path(),
        }
    }
}

#[fixture]
fn target_fixture() -> RefCell<Option<FixtureTarget>> {
    RefCell::new(None)
}

#[fixture]
fn load_result() -> LoadOutcome {
    RefCell::new(None)
}

fn with_graph(result: &LoadOutcome, check: impl FnOnce(&OsmGraph)) {
    let borrowed = result.borrow();
    let outcome = borrowed.as_ref().expect("load was attempted");
    match outcome {
        Ok(graph) => check(graph),
        Err(err) => panic!("expected a graph, got {err:?}"),
    }
}

fn with_error(result: &LoadOutcome, check: impl FnOnce(&OsmLoadError)) {
    let borrowed = result.borrow();
    let outcome = borrowed.as_ref().expect("load was attempted");
    match outcome {
        Ok(_) => panic!("expected the load to fail"),
        Err(err) => check(err),
    }
}

fn prepare(target: &RefCell<Option<FixtureTarget>>, result: &LoadOutcome, next: FixtureTarget) {
    *target.borrow_mut() = Some(next);
    *result.borrow_mut() = None;
}

#[given("a valid PBF file containing 3 nodes, 1 way and 1 relation")]
fn valid_dataset(
    #[from(fixtures_dir)] dir: PathBuf,
    #[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>,
    #[from(load_result)] result: &LoadOutcome,
) {
    let fixture = decode_fixture(&dir, "triangle");
    prepare(target, result, FixtureTarget::Existing(fixture));
}

#[given("a path to a missing PBF file")]
fn missing_dataset(
    #[from(fixtures_dir)] dir: PathBuf,
    #[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>,
    #[from(load_result)] result: &LoadOutcome,
) {
    prepare(
        target,
        result,
        FixtureTarget::Missing(dir.join("missing.osm.pbf")),
    );
}

#[given("a path to a file containing invalid PBF data")]
fn invalid_dataset(
    #[from(fixtures_dir)] dir: PathBuf,
    #[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>,
    #[from(load_result)] result: &LoadOutcome,
) {
    let fixture = decode_fixture(&dir, "invalid");
    prepare(target, result, FixtureTarget::Existing(fixture));
}

#[given("a PBF file whose way references a missing node")]
fn dangling_dataset(
    #[from(fixtures_dir)] dir: PathBuf,
    #[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>,
    #[from(load_result)] result: &LoadOutcome,
) {
    let fixture = decode_fixture(&dir, "dangling");
    prepare(target, result, FixtureTarget::Existing(fixture));
}

#[when("I load the PBF file")]
fn load_selected(
    #[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>,
    #[from(load_result)] result: &LoadOutcome,
) {
    let outcome = {
        let guard = target.borrow();
        let borrowed = guard.as_ref().expect("target path prepared");
        load_osm_pbf(borrowed.path(), &DecodeOptions::default())
    };
    *result.borrow_mut() = Some(outcome);
}

#[then("the graph holds 3 nodes, 1 way and 1 relation")]
fn graph_counts(#[from(load_result)] result: &LoadOutcome) {
    with_graph(result, |graph| {
        assert_eq!(graph.nodes.len(), 3, "expected three nodes");
        assert_eq!(graph.ways.len(), 1, "expected one way");
        assert_eq!(graph.relations.len(), 1, "expected one relation");
    });
}

#[then("the graph bounds span the sample coordinates")]
fn graph_bounds(#[from(load_result)] result: &LoadOutcome) {
    with_graph(result, |graph| {
        let bounds = graph.bounds;
        assert!(!bounds.is_empty(), "sample data should produce bounds");
        assert_close(bounds.lower_left.lat, 52.12);
        assert_close(bounds.lower_left.lon, 11.62);
        assert_close(bounds.upper_right.lat, 52.1224);
        assert_close(bounds.upper_right.lon, 11.631);
    });
}

#[then("way 10 is resolved against its nodes")]
fn way_resolved(#[from(load_result)] result: &LoadOutcome) {
    with_graph(result, |graph| {
        let way = graph.way(10).expect("way 10 present");
        let nodes = way.nodes.as_ref().expect("way 10 resolved");
        assert_eq!(nodes.len(), way.node_ids.len());
        for (node, id) in nodes.iter().zip(&way.node_ids) {
            let stored = graph.node(*id).expect("referenced node stored");
            assert!(Arc::ptr_eq(node, stored), "node {id} should be shared");
        }
    });
}

#[then("an open error is returned")]
fn open_error(#[from(load_result)] result: &LoadOutcome) {
    with_error(result, |err| match err {
        OsmLoadError::Open { path, .. } => {
            assert!(
                path.ends_with("missing.osm.pbf"),
                "unexpected path in error: {path:?}"
            );
        }
        other => panic!("expected an open error, got {other:?}"),
    });
}

#[then("a decode error naming the file is returned")]
fn decode_error(#[from(load_result)] result: &LoadOutcome) {
    with_error(result, |err| match err {
        OsmLoadError::Decode {
            origin: Origin::Path(path),
            source,
        } => {
            let extension = path.extension().and_then(|ext| ext.to_str());
            assert_eq!(extension, Some("pbf"), "unexpected path in error: {path:?}");
            assert!(
                !source.to_string().is_empty(),
                "decode error should preserve the source message"
            );
        }
        other => panic!("expected a decode error, got {other:?}"),
    });
}

#[then("a missing node error for way 10 is returned")]
fn missing_node_error(#[from(load_result)] result: &LoadOutcome) {
    with_error(result, |err| {
        assert!(
            matches!(
                err,
                OsmLoadError::Resolve(ResolveError::MissingNodeReference {
                    way_id: 10,
                    node_id: 99
                })
            ),
            "unexpected error: {err:?}"
        );
        assert_eq!(err.to_string(), "missing node #99 in way #10");
    });
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/load_osm_pbf.feature");
    let contents = fs::read_to_string(&feature).unwrap_or_else(|err| {
        panic!("failed to read feature file {feature:?}: {err}");
    });
    let titles: Vec<&str> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .collect();
    assert_eq!(
        titles,
        [
            "loading a known dataset",
            "reporting a missing file",
            "rejecting a corrupted dataset",
            "rejecting a dangling way reference",
        ],
        "scenario order changed in feature file"
    );
}

#[scenario(path = "tests/features/load_osm_pbf.feature", index = 0)]
fn loading_known_dataset(
    fixtures_dir: PathBuf,
    target_fixture: RefCell<Option<FixtureTarget>>,
    load_result: LoadOutcome,
) {
    let _ = (fixtures_dir, target_fixture, load_result);
}

#[scenario(path = "tests/features/load_osm_pbf.feature", index = 1)]
fn reporting_missing_files(
    fixtures_dir: PathBuf,
    target_fixture: RefCell<Option<FixtureTarget>>,
    load_result: LoadOutcome,
) {
    let _ = (fixtures_dir, target_fixture, load_result);
}

#[scenario(path = "tests/features/load_osm_pbf.feature", index = 2)]
fn rejecting_invalid_payloads(
    fixtures_dir: PathBuf,
    target_fixture: RefCell<Option<FixtureTarget>>,
    load_result: LoadOutcome,
) {
    let _ = (fixtures_dir, target_fixture, load_result);
}

#[scenario(path = "tests/features/load_osm_pbf.feature", index = 3)]
fn rejecting_dangling_references(
    fixtures_dir: PathBuf,
    target_fixture: RefCell<Option<FixtureTarget>>,
    load_result: LoadOutcome,
) {
    let _ = (fixtures_dir, target_fixture, load_result);
}
