//! Test-only helpers: primitive builders and a recording handler.

use std::convert::Infallible;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::primitive::{MemberRecord, NodeRecord, Primitive, RecordInfo, RelationRecord, WayRecord};
use crate::{BBox, Handler, MemberKind, Metadata, Node, Point, Relation, Tags, Timestamp, User, Way};

/// Metadata shared by hand-built entities.
pub fn sample_meta() -> Metadata {
    Metadata {
        version: 1,
        timestamp: Arc::new(Timestamp::from_millis(0)),
        changeset: 1,
        visible: true,
        user: Arc::new(User::new(1, "tester")),
    }
}

/// A hand-built node without tags.
pub fn sample_node(id: i64, lat: f64, lon: f64) -> Node {
    Node {
        id,
        point: Point::new(lat, lon),
        meta: sample_meta(),
        tags: Tags::new(),
    }
}

/// Record metadata authored by `uid`/`user` at `millis`.
pub fn record_info(uid: i32, user: &str, millis: i64) -> RecordInfo {
    RecordInfo {
        version: 1,
        milli_timestamp: millis,
        changeset: 1,
        uid,
        user: user.to_owned(),
        visible: true,
    }
}

/// A node primitive authored by user 1.
pub fn node_primitive(id: i64, lat: f64, lon: f64) -> Primitive {
    Primitive::Node(NodeRecord {
        id,
        lat,
        lon,
        info: record_info(1, "tester", 0),
        tags: Vec::new(),
    })
}

/// A way primitive over `refs`.
pub fn way_primitive(id: i64, refs: &[i64]) -> Primitive {
    Primitive::Way(WayRecord {
        id,
        info: record_info(1, "tester", 0),
        tags: Vec::new(),
        refs: refs.to_vec(),
    })
}

/// A relation primitive with empty roles.
pub fn relation_primitive(id: i64, members: &[(MemberKind, i64)]) -> Primitive {
    Primitive::Relation(RelationRecord {
        id,
        info: record_info(1, "tester", 0),
        tags: Vec::new(),
        members: members
            .iter()
            .map(|&(kind, member_id)| MemberRecord {
                id: member_id,
                kind,
                role: String::new(),
            })
            .collect(),
    })
}

/// Wrap primitives as an infallible source.
pub fn infallible<I>(primitives: I) -> impl Iterator<Item = Result<Primitive, Infallible>>
where
    I: IntoIterator<Item = Primitive>,
{
    primitives.into_iter().map(Ok)
}

/// One callback observed by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// `read_node` was called.
    Node(Arc<Node>),
    /// `read_way` was called.
    Way(Arc<Way>),
    /// `read_relation` was called.
    Relation(Arc<Relation>),
    /// `read_bounds` was called.
    Bounds(BBox),
}

/// Streaming handler that records every delivery and can stop on demand.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    /// Deliveries in arrival order.
    pub deliveries: Vec<Delivery>,
    /// Stop after delivering the way with this id.
    pub stop_after_way: Option<i64>,
    /// Stop after this many nodes.
    pub stop_after_nodes: Option<usize>,
}

impl RecordingHandler {
    /// Identifiers of delivered entities, prefixed by kind.
    pub fn delivered_ids(&self) -> Vec<String> {
        self.deliveries
            .iter()
            .filter_map(|delivery| match delivery {
                Delivery::Node(node) => Some(format!("n{}", node.id)),
                Delivery::Way(way) => Some(format!("w{}", way.id)),
                Delivery::Relation(relation) => Some(format!("r{}", relation.id)),
                Delivery::Bounds(_) => None,
            })
            .collect()
    }

    /// Every bounds delivery.
    pub fn bounds(&self) -> Vec<BBox> {
        self.deliveries
            .iter()
            .filter_map(|delivery| match delivery {
                Delivery::Bounds(bounds) => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    fn node_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|delivery| matches!(delivery, Delivery::Node(_)))
            .count()
    }
}

impl Handler for RecordingHandler {
    fn read_node(&mut self, node: Arc<Node>) -> ControlFlow<()> {
        self.deliveries.push(Delivery::Node(node));
        match self.stop_after_nodes {
            Some(limit) if self.node_count() >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }

    fn read_way(&mut self, way: Arc<Way>) -> ControlFlow<()> {
        let id = way.id;
        self.deliveries.push(Delivery::Way(way));
        if self.stop_after_way == Some(id) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn read_relation(&mut self, relation: Arc<Relation>) -> ControlFlow<()> {
        self.deliveries.push(Delivery::Relation(relation));
        ControlFlow::Continue(())
    }

    fn read_bounds(&mut self, bounds: BBox) -> ControlFlow<()> {
        self.deliveries.push(Delivery::Bounds(bounds));
        ControlFlow::Continue(())
    }
}
