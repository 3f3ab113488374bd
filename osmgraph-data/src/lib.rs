//! OpenStreetMap PBF input for the osmgraph pipeline.
//!
//! Responsibilities:
//! - Turn `.osm.pbf` blobs into [`osmgraph_core::primitive::Primitive`]
//!   records, one block at a time.
//! - Offer file, byte and reader entry points that run a full decode pass.
//!
//! Boundaries:
//! - Entity construction, interning and resolution live in `osmgraph-core`.
//!
//! Invariants:
//! - Primitives are yielded in file order.
//! - No global mutable state.

mod pbf;

pub use pbf::{
    Origin, OsmLoadError, PbfPrimitives, load_osm_pbf, load_osm_pbf_bytes, load_osm_pbf_reader,
    stream_osm_pbf, stream_osm_pbf_reader,
};
