//! Entity graph data model.

mod entity;
mod graph;
mod meta;
mod point;
mod tags;

pub use entity::{Member, MemberKind, MemberTarget, Node, Relation, Way};
pub use graph::OsmGraph;
pub use meta::{Metadata, Timestamp, User};
pub use point::{BBox, Point};
pub use tags::Tags;
