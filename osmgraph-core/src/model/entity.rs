//! Typed OSM entities.
//!
//! Entities are immutable once built. Cross references are held as
//! `Arc`s so the materialized graph, streaming handlers and the pass's
//! lookup tables can share a single allocation per entity.

use std::fmt;
use std::sync::Arc;

use super::{Metadata, Point, Tags};

/// A single geographic point with tags and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node identifier.
    pub id: i64,
    /// Position of the node.
    pub point: Point,
    /// Version header.
    pub meta: Metadata,
    /// Node tags.
    pub tags: Tags,
}

/// An ordered path over nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    /// Way identifier.
    pub id: i64,
    /// Version header.
    pub meta: Metadata,
    /// Way tags.
    pub tags: Tags,
    /// Referenced node identifiers in path order.
    pub node_ids: Vec<i64>,
    /// Resolved nodes, index-aligned with `node_ids`.
    ///
    /// `None` when the pass was configured not to resolve references.
    pub nodes: Option<Vec<Arc<Node>>>,
}

impl Way {
    /// Whether the node list has been resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.nodes.is_some()
    }
}

/// A named grouping of members.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Relation identifier.
    pub id: i64,
    /// Version header.
    pub meta: Metadata,
    /// Relation tags.
    pub tags: Tags,
    /// Members in declaration order.
    pub members: Vec<Member>,
}

/// Declared kind of a relation member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MemberKind {
    /// The member is a node.
    Node,
    /// The member is a way.
    Way,
    /// The member is a relation.
    Relation,
}

impl MemberKind {
    /// Lower-case name used by the OSM XML format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity a resolved member points at.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberTarget {
    /// A resolved node.
    Node(Arc<Node>),
    /// A resolved way.
    Way(Arc<Way>),
    /// A resolved relation.
    Relation(Arc<Relation>),
}

impl MemberTarget {
    /// Kind of the referenced entity.
    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Node(_) => MemberKind::Node,
            Self::Way(_) => MemberKind::Way,
            Self::Relation(_) => MemberKind::Relation,
        }
    }

    /// Identifier of the referenced entity.
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Node(node) => node.id,
            Self::Way(way) => way.id,
            Self::Relation(relation) => relation.id,
        }
    }
}

/// One entry of a relation.
///
/// When `target` is set its kind and identifier match `kind` and `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Declared member kind.
    pub kind: MemberKind,
    /// Identifier of the referenced entity.
    pub id: i64,
    /// Free-text role.
    pub role: String,
    /// Resolved entity, `None` when references were not resolved.
    pub target: Option<MemberTarget>,
}
