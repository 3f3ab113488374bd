//! Facade crate for the osmgraph decoder.
//!
//! This crate re-exports the entity model and decode pipeline and exposes the
//! PBF entry points behind the `pbf` feature.

#![forbid(unsafe_code)]

pub use osmgraph_core::{
    BBox, BoundsAccumulator, CheckpointHook, CheckpointStats, DEFAULT_CHECKPOINT_INTERVAL,
    DecodeError, DecodeOptions, EntityBuilder, EntityIndex, EntityLookup, GraphSink, Handler,
    Interner, LogCheckpoint, Member, MemberKind, MemberTarget, Metadata, Node, OsmGraph,
    PassSummary, Point, ReferenceMode, Relation, ResolveError, TagFilter, Tags, Timestamp, User,
    Way, materialize, materialize_with_hook, resolve_relation, resolve_way, stream,
    stream_with_hook,
};
pub use osmgraph_core::{primitive, xml};

#[cfg(feature = "pbf")]
pub use osmgraph_data::{
    Origin, OsmLoadError, PbfPrimitives, load_osm_pbf, load_osm_pbf_bytes, load_osm_pbf_reader,
    stream_osm_pbf, stream_osm_pbf_reader,
};
