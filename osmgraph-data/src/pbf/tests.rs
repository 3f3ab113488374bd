//! Unit tests for PBF decoding against the encoded fixtures.

use super::*;
use base64::{Engine as _, engine::general_purpose};
use osmgraph_core::test_support::{Delivery, RecordingHandler};
use osmgraph_core::{MemberKind, MemberTarget, ReferenceMode};
use rstest::{fixture, rstest};
use std::sync::Arc;

fn decode(encoded: &str) -> Vec<u8> {
    let cleaned: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .expect("fixture is valid base64")
}

#[fixture]
fn triangle() -> Vec<u8> {
    decode(include_str!("../../tests/fixtures/triangle.osm.pbf.b64"))
}

#[fixture]
fn dangling() -> Vec<u8> {
    decode(include_str!("../../tests/fixtures/dangling.osm.pbf.b64"))
}

#[fixture]
fn invalid() -> Vec<u8> {
    decode(include_str!("../../tests/fixtures/invalid.osm.pbf.b64"))
}

#[rstest]
fn yields_primitives_in_file_order(triangle: Vec<u8>) {
    let kinds: Vec<String> = PbfPrimitives::new(Cursor::new(triangle))
        .map(|primitive| primitive.expect("fixture decodes"))
        .map(|primitive| match primitive {
            Primitive::Node(node) => format!("n{}", node.id),
            Primitive::Way(way) => format!("w{}", way.id),
            Primitive::Relation(relation) => format!("r{}", relation.id),
            Primitive::Unrecognized { kind } => kind,
        })
        .collect();
    assert_eq!(kinds, ["n1", "n2", "n3", "w10", "r20", "OSMChangeset"]);
}

#[rstest]
fn reads_dense_and_plain_metadata(triangle: Vec<u8>) {
    let records: Vec<_> = PbfPrimitives::new(Cursor::new(triangle))
        .filter_map(|primitive| match primitive.expect("fixture decodes") {
            Primitive::Node(node) => Some(node),
            _ => None,
        })
        .collect();
    let [dense, _, plain] = records.as_slice() else {
        panic!("expected three nodes, got {records:?}");
    };
    assert_eq!(dense.info.uid, 7);
    assert_eq!(dense.info.user, "alice");
    assert_eq!(dense.info.milli_timestamp, 1_600_000_000_000);
    assert_eq!(
        dense.tags,
        [("highway".to_owned(), "crossing".to_owned())]
    );
    assert_eq!(plain.info.uid, 8);
    assert_eq!(plain.info.user, "bob");
    assert_eq!(plain.info.version, 2);
    assert_eq!(plain.info.changeset, 101);
    assert!(plain.info.visible);
}

#[rstest]
fn reads_relation_member_kinds_and_roles(triangle: Vec<u8>) {
    let relation = PbfPrimitives::new(Cursor::new(triangle))
        .find_map(|primitive| match primitive.expect("fixture decodes") {
            Primitive::Relation(relation) => Some(relation),
            _ => None,
        })
        .expect("relation 20 decoded");
    let members: Vec<(i64, MemberKind, &str)> = relation
        .members
        .iter()
        .map(|member| (member.id, member.kind, member.role.as_str()))
        .collect();
    assert_eq!(
        members,
        [(10, MemberKind::Way, ""), (3, MemberKind::Node, "stop")]
    );
}

#[rstest]
fn loads_a_resolved_graph_from_bytes(triangle: Vec<u8>) {
    let graph = load_osm_pbf_bytes(&triangle, &DecodeOptions::default()).expect("fixture loads");
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.ways.len(), 1);
    assert_eq!(graph.relations.len(), 1);
    assert_eq!(graph.users.len(), 2);

    let way = graph.way(10).expect("way 10 present");
    assert_eq!(way.tags.get("name"), Some("Main St & 1st"));
    let nodes = way.nodes.as_ref().expect("way resolved");
    assert_eq!(nodes.len(), 3);

    let relation = graph.relation(20).expect("relation 20 present");
    let roles: Vec<&str> = relation.members.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, ["", "stop"]);
    match relation.members.get(1).and_then(|member| member.target.as_ref()) {
        Some(MemberTarget::Node(node)) => {
            let stored = graph.node(3).expect("node 3 present");
            assert!(Arc::ptr_eq(node, stored));
        }
        other => panic!("expected node target, got {other:?}"),
    }
}

#[rstest]
fn reader_and_bytes_agree(triangle: Vec<u8>) {
    let options = DecodeOptions::default();
    let from_bytes = load_osm_pbf_bytes(&triangle, &options).expect("bytes load");
    let from_reader = load_osm_pbf_reader(triangle.as_slice(), &options).expect("reader loads");
    assert_eq!(from_bytes, from_reader);
}

#[rstest]
fn dangling_reference_is_reported(dangling: Vec<u8>) {
    let err = load_osm_pbf_bytes(&dangling, &DecodeOptions::default())
        .expect_err("node 99 is missing");
    match err {
        OsmLoadError::Resolve(ResolveError::MissingNodeReference { way_id, node_id }) => {
            assert_eq!((way_id, node_id), (10, 99));
        }
        other => panic!("expected a resolve error, got {other:?}"),
    }
}

#[rstest]
fn deferred_stream_tolerates_dangling_references(dangling: Vec<u8>) {
    let options = DecodeOptions {
        references: ReferenceMode::Deferred,
        ..DecodeOptions::default()
    };
    let mut handler = RecordingHandler::default();
    let summary = stream_osm_pbf_reader(dangling.as_slice(), &mut handler, &options)
        .expect("nothing is resolved");
    assert_eq!((summary.nodes, summary.ways), (1, 1));
    assert_eq!(handler.delivered_ids(), ["n1", "w10"]);
}

#[rstest]
fn stream_counts_the_unknown_blob(triangle: Vec<u8>) {
    let mut handler = RecordingHandler::default();
    let summary = stream_osm_pbf_reader(triangle.as_slice(), &mut handler, &DecodeOptions::default())
        .expect("fixture streams");
    assert_eq!(summary.skipped, 1);
    assert!(!summary.stopped);
    let relation = handler.deliveries.iter().find_map(|delivery| match delivery {
        Delivery::Relation(relation) => Some(relation),
        _ => None,
    });
    let kinds: Vec<MemberKind> = relation
        .expect("relation delivered")
        .members
        .iter()
        .filter_map(|member| member.target.as_ref().map(MemberTarget::kind))
        .collect();
    assert_eq!(kinds, [MemberKind::Way, MemberKind::Node]);
}

#[rstest]
fn corrupt_data_is_a_decode_error(invalid: Vec<u8>) {
    let err = load_osm_pbf_bytes(&invalid, &DecodeOptions::default()).expect_err("not a PBF");
    assert!(
        matches!(err, OsmLoadError::Decode { origin: Origin::Bytes, .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(
        err.to_string(),
        "failed to decode OSM PBF data from in-memory buffer"
    );
}

#[rstest]
fn iteration_stops_after_an_error(invalid: Vec<u8>) {
    let mut primitives = PbfPrimitives::new(Cursor::new(invalid));
    assert!(matches!(primitives.next(), Some(Err(_))));
    assert!(primitives.next().is_none());
}

#[rstest]
fn missing_file_is_an_open_error() {
    let path = Path::new("definitely/not/here.osm.pbf");
    let err = load_osm_pbf(path, &DecodeOptions::default()).expect_err("file is missing");
    match err {
        OsmLoadError::Open { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected an open error, got {other:?}"),
    }
}

#[rstest]
#[case(Origin::Path(PathBuf::from("berlin.osm.pbf")), "berlin.osm.pbf")]
#[case(Origin::Bytes, "in-memory buffer")]
#[case(Origin::Reader, "reader")]
fn origin_display(#[case] origin: Origin, #[case] expected: &str) {
    assert_eq!(origin.to_string(), expected);
}
