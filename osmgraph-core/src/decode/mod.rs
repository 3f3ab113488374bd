//! The single-pass decode pipeline.
//!
//! A pass reads primitives in source order, builds entities (interning
//! authors and timestamps), optionally resolves way and relation
//! references, and hands each entity to a [`Handler`]. The bounding box is
//! accumulated on every node regardless of the handler, and a
//! [`CheckpointHook`] observes progress at a fixed interval.
//!
//! [`materialize`] and [`stream`] differ only in the handler they drive:
//! the former uses [`GraphSink`] and returns the finished [`OsmGraph`].

use std::ops::ControlFlow;
use std::sync::Arc;

use log::{debug, info, warn};

mod bounds;
mod builder;
mod checkpoint;
mod error;
mod handler;
mod intern;
mod resolve;

pub use bounds::BoundsAccumulator;
pub use builder::{EntityBuilder, TagFilter};
pub use checkpoint::{CheckpointHook, CheckpointStats, DEFAULT_CHECKPOINT_INTERVAL, LogCheckpoint};
pub use error::DecodeError;
pub use handler::{GraphSink, Handler};
pub use intern::Interner;
pub use resolve::{EntityIndex, EntityLookup, ResolveError, resolve_relation, resolve_way};

use checkpoint::Governor;

use crate::primitive::Primitive;
use crate::{BBox, Node, OsmGraph, Relation, Way};

/// Whether a pass resolves way and relation references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReferenceMode {
    /// Attach referenced entities; a missing reference aborts the pass.
    ///
    /// Entities are looked up in the handler's own store when it has one
    /// (see [`Handler::lookup`]), otherwise in an index kept by the pass.
    #[default]
    Resolve,
    /// Deliver ways and relations with bare identifiers only.
    ///
    /// [`Way::nodes`] and every `Member::target` stay `None`, and the pass
    /// keeps no lookup tables.
    Deferred,
}

/// Settings for one decode pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeOptions {
    /// Tags kept on built entities.
    pub tag_filter: TagFilter,
    /// Primitives between checkpoints; zero disables them.
    pub checkpoint_interval: u64,
    /// Reference handling for [`stream`]; [`materialize`] always resolves.
    pub references: ReferenceMode,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            tag_filter: TagFilter::All,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            references: ReferenceMode::Resolve,
        }
    }
}

/// Outcome of a pass that did not fail.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassSummary {
    /// Nodes delivered.
    pub nodes: u64,
    /// Ways delivered.
    pub ways: u64,
    /// Relations delivered.
    pub relations: u64,
    /// Unrecognized primitives skipped.
    pub skipped: u64,
    /// Bounds over every node delivered.
    pub bounds: BBox,
    /// Whether the handler stopped the pass early.
    pub stopped: bool,
}

/// Decode every primitive into an in-memory graph.
///
/// References are always resolved. Any error discards the partial graph.
///
/// # Examples
/// ```
/// use osmgraph_core::primitive::{NodeRecord, Primitive};
/// use osmgraph_core::{DecodeOptions, materialize};
///
/// let primitives = [1, 2].map(|id| {
///     Ok::<_, std::io::Error>(Primitive::Node(NodeRecord {
///         id,
///         lat: 52.5,
///         lon: 13.4,
///         ..NodeRecord::default()
///     }))
/// });
/// let graph = materialize(primitives, &DecodeOptions::default())?;
/// assert_eq!(graph.nodes.len(), 2);
/// # Ok::<(), osmgraph_core::DecodeError<std::io::Error>>(())
/// ```
pub fn materialize<I, E>(primitives: I, options: &DecodeOptions) -> Result<OsmGraph, DecodeError<E>>
where
    I: IntoIterator<Item = Result<Primitive, E>>,
    E: std::error::Error + 'static,
{
    materialize_with_hook(primitives, options, LogCheckpoint)
}

/// [`materialize`] with a custom checkpoint hook.
pub fn materialize_with_hook<I, E, C>(
    primitives: I,
    options: &DecodeOptions,
    hook: C,
) -> Result<OsmGraph, DecodeError<E>>
where
    I: IntoIterator<Item = Result<Primitive, E>>,
    E: std::error::Error + 'static,
    C: CheckpointHook,
{
    let mut pass = Pass::new(GraphSink::new(), hook, options, ReferenceMode::Resolve);
    pass.run(primitives)?;
    let (sink, builder) = pass.into_parts();
    Ok(sink.into_graph(builder.into_interner()))
}

/// Decode primitives and deliver each entity to `handler`.
///
/// Pass `&mut handler` to keep ownership of the handler. Entities the
/// handler already received remain valid when the pass fails.
pub fn stream<I, E, H>(
    primitives: I,
    handler: H,
    options: &DecodeOptions,
) -> Result<PassSummary, DecodeError<E>>
where
    I: IntoIterator<Item = Result<Primitive, E>>,
    E: std::error::Error + 'static,
    H: Handler,
{
    stream_with_hook(primitives, handler, options, LogCheckpoint)
}

/// [`stream`] with a custom checkpoint hook.
pub fn stream_with_hook<I, E, H, C>(
    primitives: I,
    handler: H,
    options: &DecodeOptions,
    hook: C,
) -> Result<PassSummary, DecodeError<E>>
where
    I: IntoIterator<Item = Result<Primitive, E>>,
    E: std::error::Error + 'static,
    H: Handler,
    C: CheckpointHook,
{
    let mut pass = Pass::new(handler, hook, options, options.references);
    pass.run(primitives)
}

/// Where a pass looks up referenced entities.
#[derive(Debug)]
enum References {
    Deferred,
    Handler,
    Owned(EntityIndex),
}

/// Lookup used when a handler stops exposing its store mid-pass.
struct NoEntities;

impl EntityLookup for NoEntities {
    fn node(&self, _id: i64) -> Option<Arc<Node>> {
        None
    }

    fn way(&self, _id: i64) -> Option<Arc<Way>> {
        None
    }

    fn relation(&self, _id: i64) -> Option<Arc<Relation>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Nodes,
    Ways,
    Relations,
}

struct Pass<H, C> {
    handler: H,
    hook: C,
    builder: EntityBuilder,
    bounds: BoundsAccumulator,
    governor: Governor,
    references: References,
    summary: PassSummary,
    primitives: u64,
    phase: Phase,
}

impl<H, C> Pass<H, C>
where
    H: Handler,
    C: CheckpointHook,
{
    fn new(handler: H, hook: C, options: &DecodeOptions, mode: ReferenceMode) -> Self {
        let references = match mode {
            ReferenceMode::Deferred => References::Deferred,
            ReferenceMode::Resolve if handler.lookup().is_some() => References::Handler,
            ReferenceMode::Resolve => References::Owned(EntityIndex::default()),
        };
        Self {
            handler,
            hook,
            builder: EntityBuilder::new(options.tag_filter.clone()),
            bounds: BoundsAccumulator::new(),
            governor: Governor::new(options.checkpoint_interval),
            references,
            summary: PassSummary::default(),
            primitives: 0,
            phase: Phase::Nodes,
        }
    }

    fn run<I, E>(&mut self, primitives: I) -> Result<PassSummary, DecodeError<E>>
    where
        I: IntoIterator<Item = Result<Primitive, E>>,
        E: std::error::Error + 'static,
    {
        for next in primitives {
            let primitive = next.map_err(DecodeError::Source)?;
            let flow = self.process(primitive)?;
            self.primitives += 1;
            self.checkpoint();
            if flow.is_break() {
                info!("Handler stopped the pass after {} primitives", self.primitives);
                self.summary.stopped = true;
                break;
            }
        }

        self.summary.bounds = self.bounds.finish();
        if self.handler.read_bounds(self.summary.bounds).is_break() {
            debug!("Handler asked to stop at the bounds callback");
        }
        debug!(
            "Decode pass finished: {} nodes, {} ways, {} relations, {} skipped",
            self.summary.nodes, self.summary.ways, self.summary.relations, self.summary.skipped
        );
        Ok(self.summary)
    }

    fn process(&mut self, primitive: Primitive) -> Result<ControlFlow<()>, ResolveError> {
        match primitive {
            Primitive::Node(record) => {
                let node = Arc::new(self.builder.node(record));
                self.bounds.include(node.point);
                self.summary.nodes += 1;
                if let References::Owned(index) = &mut self.references {
                    index.insert_node(&node);
                }
                Ok(self.handler.read_node(node))
            }
            Primitive::Way(record) => {
                self.enter(Phase::Ways);
                let unresolved = self.builder.way(record);
                let way = match self.lookup() {
                    Some(lookup) => Arc::new(resolve_way(unresolved, lookup)?),
                    None => Arc::new(unresolved),
                };
                self.summary.ways += 1;
                if let References::Owned(index) = &mut self.references {
                    index.insert_way(&way);
                }
                Ok(self.handler.read_way(way))
            }
            Primitive::Relation(record) => {
                self.enter(Phase::Relations);
                let unresolved = self.builder.relation(record);
                let relation = match self.lookup() {
                    Some(lookup) => Arc::new(resolve_relation(unresolved, lookup)?),
                    None => Arc::new(unresolved),
                };
                self.summary.relations += 1;
                if let References::Owned(index) = &mut self.references {
                    index.insert_relation(&relation);
                }
                Ok(self.handler.read_relation(relation))
            }
            unrecognized @ Primitive::Unrecognized { .. } => {
                warn!(
                    "Skipping primitive of unrecognized kind {:?}",
                    unrecognized.kind_name()
                );
                self.summary.skipped += 1;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    fn lookup(&self) -> Option<&dyn EntityLookup> {
        match &self.references {
            References::Deferred => None,
            References::Handler => Some(self.handler.lookup().unwrap_or(&NoEntities)),
            References::Owned(index) => Some(index),
        }
    }

    fn enter(&mut self, phase: Phase) {
        if phase > self.phase {
            self.phase = phase;
            match phase {
                Phase::Ways => info!("Processing ways"),
                Phase::Relations => info!("Processing relations"),
                Phase::Nodes => {}
            }
        }
    }

    fn checkpoint(&mut self) {
        let Some(elapsed) = self.governor.tick() else {
            return;
        };
        let stats = CheckpointStats {
            primitives: self.primitives,
            nodes: self.summary.nodes,
            ways: self.summary.ways,
            relations: self.summary.relations,
            users: self.builder.interner().user_count(),
            elapsed,
        };
        self.hook.checkpoint(&stats);
    }

    fn into_parts(self) -> (H, EntityBuilder) {
        (self.handler, self.builder)
    }
}
