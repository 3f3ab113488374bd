//! Turn primitive records into typed entities.

use std::collections::BTreeSet;

use super::Interner;
use crate::primitive::{NodeRecord, RecordInfo, RelationRecord, WayRecord};
use crate::{Member, Metadata, Node, Point, Relation, Tags, Way};

/// Which tags survive entity construction.
///
/// # Examples
/// ```
/// use osmgraph_core::TagFilter;
///
/// let filter = TagFilter::keys(["highway", "maxspeed"]);
/// assert!(filter.keeps("highway", "primary"));
/// assert!(!filter.keeps("name", "Main St"));
/// assert!(TagFilter::All.keeps("name", "Main St"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TagFilter {
    /// Keep every tag.
    #[default]
    All,
    /// Keep only tags whose key is listed.
    Keys(BTreeSet<String>),
}

impl TagFilter {
    /// Keep only the listed keys.
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// Whether the pair passes the filter.
    #[must_use]
    pub fn keeps(&self, key: &str, _value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Keys(keys) => keys.contains(key),
        }
    }
}

/// Builds entities from records, interning shared metadata.
#[derive(Debug, Default)]
pub struct EntityBuilder {
    filter: TagFilter,
    interner: Interner,
}

impl EntityBuilder {
    /// Create a builder applying `filter` to every tag set.
    #[must_use]
    pub fn new(filter: TagFilter) -> Self {
        Self {
            filter,
            interner: Interner::new(),
        }
    }

    /// The interning tables built so far.
    #[must_use]
    pub const fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Release the interning tables.
    #[must_use]
    pub fn into_interner(self) -> Interner {
        self.interner
    }

    /// Build a node.
    pub fn node(&mut self, record: NodeRecord) -> Node {
        Node {
            id: record.id,
            point: Point::new(record.lat, record.lon),
            meta: self.metadata(&record.info),
            tags: self.tags(record.tags),
        }
    }

    /// Build a way whose node list is not yet resolved.
    pub fn way(&mut self, record: WayRecord) -> Way {
        Way {
            id: record.id,
            meta: self.metadata(&record.info),
            tags: self.tags(record.tags),
            node_ids: record.refs,
            nodes: None,
        }
    }

    /// Build a relation whose members are not yet resolved.
    pub fn relation(&mut self, record: RelationRecord) -> Relation {
        let members = record
            .members
            .into_iter()
            .map(|member| Member {
                kind: member.kind,
                id: member.id,
                role: member.role,
                target: None,
            })
            .collect();
        Relation {
            id: record.id,
            meta: self.metadata(&record.info),
            tags: self.tags(record.tags),
            members,
        }
    }

    fn metadata(&mut self, info: &RecordInfo) -> Metadata {
        Metadata {
            version: u32::try_from(info.version).unwrap_or(0),
            timestamp: self.interner.timestamp(info.milli_timestamp),
            changeset: info.changeset,
            visible: info.visible,
            user: self.interner.user(info.uid.cast_unsigned(), &info.user),
        }
    }

    fn tags(&self, pairs: Vec<(String, String)>) -> Tags {
        pairs
            .into_iter()
            .filter(|(key, value)| self.filter.keeps(key, value))
            .collect()
    }
}
