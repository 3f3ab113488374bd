//! Core entity model and decode pipeline for OpenStreetMap data.
//!
//! Sources hand the pipeline a sequence of [`primitive::Primitive`] records.
//! A single pass turns those into shared [`Node`], [`Way`] and [`Relation`]
//! values, interning authors and timestamps, resolving references and
//! accumulating the dataset bounds. The pass either materializes an
//! [`OsmGraph`] or streams entities to a caller-supplied [`Handler`].

#![forbid(unsafe_code)]

mod decode;
mod model;
pub mod primitive;
pub mod xml;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use decode::{
    BoundsAccumulator, CheckpointHook, CheckpointStats, DEFAULT_CHECKPOINT_INTERVAL, DecodeError,
    DecodeOptions, EntityBuilder, EntityIndex, EntityLookup, GraphSink, Handler, Interner,
    LogCheckpoint, PassSummary, ReferenceMode, ResolveError, TagFilter, materialize,
    materialize_with_hook, resolve_relation, resolve_way, stream, stream_with_hook,
};
pub use model::{
    BBox, Member, MemberKind, MemberTarget, Metadata, Node, OsmGraph, Point, Relation, Tags,
    Timestamp, User, Way,
};
