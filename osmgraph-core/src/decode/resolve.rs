//! Resolve bare identifiers into shared entity references.
//!
//! Sources normally emit nodes before ways before relations, so a single
//! forward pass with growing lookup tables is enough. A reference that
//! cannot be found is a structural error in the dataset: the offending way
//! or relation is dropped and the error is returned, never retried.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::{Member, MemberKind, MemberTarget, Node, Relation, Way};

/// Identifier-keyed access to entities already seen in the pass.
pub trait EntityLookup {
    /// Find a node by id.
    fn node(&self, id: i64) -> Option<Arc<Node>>;
    /// Find a way by id.
    fn way(&self, id: i64) -> Option<Arc<Way>>;
    /// Find a relation by id.
    fn relation(&self, id: i64) -> Option<Arc<Relation>>;
}

/// Errors raised when a reference does not resolve.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A way references a node that has not been seen.
    #[error("missing node #{node_id} in way #{way_id}")]
    MissingNodeReference {
        /// Way being resolved.
        way_id: i64,
        /// First node id that could not be found.
        node_id: i64,
    },
    /// A relation references a member that has not been seen.
    #[error("missing member #{member_id} ({kind}) in relation #{relation_id}")]
    MissingMemberReference {
        /// Relation being resolved.
        relation_id: i64,
        /// First member id that could not be found.
        member_id: i64,
        /// Declared kind of that member.
        kind: MemberKind,
    },
}

/// Lookup tables a pass keeps when its handler retains nothing itself.
#[derive(Debug, Default)]
pub struct EntityIndex {
    nodes: HashMap<i64, Arc<Node>>,
    ways: HashMap<i64, Arc<Way>>,
    relations: HashMap<i64, Arc<Relation>>,
}

impl EntityIndex {
    /// Remember a node.
    pub fn insert_node(&mut self, node: &Arc<Node>) {
        self.nodes.insert(node.id, Arc::clone(node));
    }

    /// Remember a way.
    pub fn insert_way(&mut self, way: &Arc<Way>) {
        self.ways.insert(way.id, Arc::clone(way));
    }

    /// Remember a relation.
    pub fn insert_relation(&mut self, relation: &Arc<Relation>) {
        self.relations.insert(relation.id, Arc::clone(relation));
    }
}

impl EntityLookup for EntityIndex {
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

/// Attach the referenced nodes to `way`.
///
/// On success `nodes` is index-aligned with `node_ids`. On failure the way
/// is consumed and the first missing id is reported.
pub fn resolve_way(mut way: Way, lookup: &dyn EntityLookup) -> Result<Way, ResolveError> {
    let nodes = way
        .node_ids
        .iter()
        .map(|&node_id| {
            lookup
                .node(node_id)
                .ok_or(ResolveError::MissingNodeReference {
                    way_id: way.id,
                    node_id,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    way.nodes = Some(nodes);
    Ok(way)
}

/// Attach the referenced entities to every member of `relation`.
///
/// Members are resolved in order; the first unresolvable one aborts the
/// relation.
pub fn resolve_relation(
    mut relation: Relation,
    lookup: &dyn EntityLookup,
) -> Result<Relation, ResolveError> {
    let relation_id = relation.id;
    for member in &mut relation.members {
        let target = find_target(member, lookup).ok_or(ResolveError::MissingMemberReference {
            relation_id,
            member_id: member.id,
            kind: member.kind,
        })?;
        member.target = Some(target);
    }
    Ok(relation)
}

fn find_target(member: &Member, lookup: &dyn EntityLookup) -> Option<MemberTarget> {
    match member.kind {
        MemberKind::Node => lookup.node(member.id).map(MemberTarget::Node),
        MemberKind::Way => lookup.way(member.id).map(MemberTarget::Way),
        MemberKind::Relation => lookup.relation(member.id).map(MemberTarget::Relation),
    }
}
