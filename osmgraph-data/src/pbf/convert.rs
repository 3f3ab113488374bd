//! Copy decoded `osmpbf` elements into owned primitive records.
//!
//! Elements borrow their block's string table, so each one is converted
//! before the block is dropped.

use log::debug;
use osmgraph_core::MemberKind;
use osmgraph_core::primitive::{
    MemberRecord, NodeRecord, Primitive, RecordInfo, RelationRecord, WayRecord,
};
use osmpbf::{DenseNodeInfo, Element, Info, RelMemberType};

pub(super) fn element(element: Element<'_>) -> Primitive {
    match element {
        Element::Node(node) => Primitive::Node(NodeRecord {
            id: node.id(),
            lat: node.lat(),
            lon: node.lon(),
            info: info(&node.info()),
            tags: owned_tags(node.tags()),
        }),
        Element::DenseNode(node) => Primitive::Node(NodeRecord {
            id: node.id(),
            lat: node.lat(),
            lon: node.lon(),
            info: node.info().map_or_else(absent_info, dense_info),
            tags: owned_tags(node.tags()),
        }),
        Element::Way(way) => Primitive::Way(WayRecord {
            id: way.id(),
            info: info(&way.info()),
            tags: owned_tags(way.tags()),
            refs: way.refs().collect(),
        }),
        Element::Relation(relation) => Primitive::Relation(RelationRecord {
            id: relation.id(),
            info: info(&relation.info()),
            tags: owned_tags(relation.tags()),
            members: relation
                .members()
                .map(|member| MemberRecord {
                    id: member.member_id,
                    role: member.role().unwrap_or_default().to_owned(),
                    kind: member_kind(member.member_type),
                })
                .collect(),
        }),
    }
}

fn info(info: &Info<'_>) -> RecordInfo {
    RecordInfo {
        version: info.version().unwrap_or_default(),
        milli_timestamp: info.milli_timestamp().unwrap_or_default(),
        changeset: info.changeset().unwrap_or_default(),
        uid: info.uid().unwrap_or_default(),
        user: user_name(info.user().and_then(Result::ok)),
        visible: info.visible(),
    }
}

fn dense_info(info: &DenseNodeInfo<'_>) -> RecordInfo {
    RecordInfo {
        version: info.version(),
        milli_timestamp: info.milli_timestamp(),
        changeset: info.changeset(),
        uid: info.uid(),
        user: user_name(info.user().ok()),
        visible: info.visible(),
    }
}

/// Dense nodes written without `DenseInfo` carry no metadata at all.
fn absent_info() -> RecordInfo {
    RecordInfo {
        visible: true,
        ..RecordInfo::default()
    }
}

fn user_name(name: Option<&str>) -> String {
    name.map_or_else(
        || {
            debug!("User name is missing or not valid UTF-8");
            String::new()
        },
        str::to_owned,
    )
}

fn owned_tags<'a>(tags: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<(String, String)> {
    tags.map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

const fn member_kind(kind: RelMemberType) -> MemberKind {
    match kind {
        RelMemberType::Node => MemberKind::Node,
        RelMemberType::Way => MemberKind::Way,
        RelMemberType::Relation => MemberKind::Relation,
    }
}
