use std::collections::HashMap;
use std::sync::Arc;

use super::{BBox, Node, Relation, Timestamp, User, Way};
use crate::decode::EntityLookup;

/// The fully materialized result of a decode pass.
///
/// Entities are keyed by identifier; a later entity with the same id
/// replaces the earlier one. The interning tables built during the pass are
/// kept so callers can inspect the shared `User` and `Timestamp` instances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OsmGraph {
    /// Nodes by identifier.
    pub nodes: HashMap<i64, Arc<Node>>,
    /// Ways by identifier.
    pub ways: HashMap<i64, Arc<Way>>,
    /// Relations by identifier.
    pub relations: HashMap<i64, Arc<Relation>>,
    /// Interned users by user id.
    pub users: HashMap<u32, Arc<User>>,
    /// Interned timestamps by raw value.
    pub timestamps: HashMap<i64, Arc<Timestamp>>,
    /// Bounds over every node seen during the pass.
    pub bounds: BBox,
}

impl OsmGraph {
    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: i64) -> Option<&Arc<Node>> {
        self.nodes.get(&id)
    }

    /// Look up a way.
    #[must_use]
    pub fn way(&self, id: i64) -> Option<&Arc<Way>> {
        self.ways.get(&id)
    }

    /// Look up a relation.
    #[must_use]
    pub fn relation(&self, id: i64) -> Option<&Arc<Relation>> {
        self.relations.get(&id)
    }

    /// Whether the graph contains no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty() && self.relations.is_empty()
    }
}

impl EntityLookup for OsmGraph {
    fn node(&self, id: i64) -> Option<Arc<Node>> {
        self.nodes.get(&id).cloned()
    }

    fn way(&self, id: i64) -> Option<Arc<Way>> {
        self.ways.get(&id).cloned()
    }

    fn relation(&self, id: i64) -> Option<Arc<Relation>> {
        self.relations.get(&id).cloned()
    }
}
