//! Consumers of finished entities.
//!
//! A pass delivers every entity through [`Handler`], whether the caller
//! streams or wants the whole graph; [`GraphSink`] is the materializing
//! implementation used by [`materialize`](super::materialize).

use std::ops::ControlFlow;
use std::sync::Arc;

use super::{EntityLookup, Interner};
use crate::{BBox, Node, OsmGraph, Relation, Way};

/// Receives entities in arrival order.
///
/// Returning [`ControlFlow::Break`] from any callback stops the pass: no
/// further primitives are read, and [`Handler::read_bounds`] is still called
/// once with the extent accumulated so far.
///
/// # Examples
/// ```
/// use std::ops::ControlFlow;
/// use std::sync::Arc;
/// use osmgraph_core::{BBox, Handler, Node, Relation, Way};
///
/// #[derive(Default)]
/// struct FirstNodes {
///     seen: Vec<i64>,
/// }
///
/// impl Handler for FirstNodes {
///     fn read_node(&mut self, node: Arc<Node>) -> ControlFlow<()> {
///         self.seen.push(node.id);
///         if self.seen.len() < 10 {
///             ControlFlow::Continue(())
///         } else {
///             ControlFlow::Break(())
///         }
///     }
///
///     fn read_way(&mut self, _way: Arc<Way>) -> ControlFlow<()> {
///         ControlFlow::Break(())
///     }
///
///     fn read_relation(&mut self, _relation: Arc<Relation>) -> ControlFlow<()> {
///         ControlFlow::Break(())
///     }
///
///     fn read_bounds(&mut self, _bounds: BBox) -> ControlFlow<()> {
///         ControlFlow::Continue(())
///     }
/// }
/// ```
pub trait Handler {
    /// Receive a node.
    fn read_node(&mut self, node: Arc<Node>) -> ControlFlow<()>;

    /// Receive a way.
    fn read_way(&mut self, way: Arc<Way>) -> ControlFlow<()>;

    /// Receive a relation.
    fn read_relation(&mut self, relation: Arc<Relation>) -> ControlFlow<()>;

    /// Receive the bounds of all nodes seen, once, at the end of the pass.
    ///
    /// The box is empty (see [`BBox::is_empty`]) when no node was seen.
    fn read_bounds(&mut self, bounds: BBox) -> ControlFlow<()>;

    /// Entities this handler already retains, if it keeps them.
    ///
    /// A resolving pass uses this store instead of building its own index.
    fn lookup(&self) -> Option<&dyn EntityLookup> {
        None
    }
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn read_node(&mut self, node: Arc<Node>) -> ControlFlow<()> {
        (**self).read_node(node)
    }

    fn read_way(&mut self, way: Arc<Way>) -> ControlFlow<()> {
        (**self).read_way(way)
    }

    fn read_relation(&mut self, relation: Arc<Relation>) -> ControlFlow<()> {
        (**self).read_relation(relation)
    }

    fn read_bounds(&mut self, bounds: BBox) -> ControlFlow<()> {
        (**self).read_bounds(bounds)
    }

    fn lookup(&self) -> Option<&dyn EntityLookup> {
        (**self).lookup()
    }
}

/// Materializing handler that owns every entity it receives.
#[derive(Debug, Default)]
pub struct GraphSink {
    graph: OsmGraph,
}

impl GraphSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The graph built so far.
    #[must_use]
    pub const fn graph(&self) -> &OsmGraph {
        &self.graph
    }

    /// Finish the graph, taking over the pass's interning tables.
    #[must_use]
    pub fn into_graph(self, interner: Interner) -> OsmGraph {
        let (users, timestamps) = interner.into_tables();
        OsmGraph {
            users,
            timestamps,
            ..self.graph
        }
    }
}

impl Handler for GraphSink {
    fn read_node(&mut self, node: Arc<Node>) -> ControlFlow<()> {
        self.graph.nodes.insert(node.id, node);
        ControlFlow::Continue(())
    }

    fn read_way(&mut self, way: Arc<Way>) -> ControlFlow<()> {
        self.graph.ways.insert(way.id, way);
        ControlFlow::Continue(())
    }

    fn read_relation(&mut self, relation: Arc<Relation>) -> ControlFlow<()> {
        self.graph.relations.insert(relation.id, relation);
        ControlFlow::Continue(())
    }

    fn read_bounds(&mut self, bounds: BBox) -> ControlFlow<()> {
        self.graph.bounds = bounds;
        ControlFlow::Continue(())
    }

    fn lookup(&self) -> Option<&dyn EntityLookup> {
        Some(&self.graph)
    }
}
