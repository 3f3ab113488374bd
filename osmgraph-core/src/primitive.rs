//! Decoded primitive records, the input of a decode pass.
//!
//! A codec turns the binary block format into these owned records in block
//! order. Nothing here is validated: ids may dangle and metadata may be
//! missing (zeroed) when the source omitted it.

use crate::MemberKind;

/// Author, version and visibility fields as the codec reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordInfo {
    /// Entity version; negative when absent.
    pub version: i32,
    /// Edit time in milliseconds since the Unix epoch.
    pub milli_timestamp: i64,
    /// Changeset identifier.
    pub changeset: i64,
    /// Author user id.
    pub uid: i32,
    /// Author display name.
    pub user: String,
    /// Visibility flag. Codecs report `true` when the source omits it.
    pub visible: bool,
}

/// A decoded point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRecord {
    /// Node identifier.
    pub id: i64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Metadata.
    pub info: RecordInfo,
    /// Raw tag pairs.
    pub tags: Vec<(String, String)>,
}

/// A decoded path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WayRecord {
    /// Way identifier.
    pub id: i64,
    /// Metadata.
    pub info: RecordInfo,
    /// Raw tag pairs.
    pub tags: Vec<(String, String)>,
    /// Referenced node ids in path order.
    pub refs: Vec<i64>,
}

/// A decoded relation member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Identifier of the referenced entity.
    pub id: i64,
    /// Declared kind.
    pub kind: MemberKind,
    /// Member role.
    pub role: String,
}

/// A decoded grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationRecord {
    /// Relation identifier.
    pub id: i64,
    /// Metadata.
    pub info: RecordInfo,
    /// Raw tag pairs.
    pub tags: Vec<(String, String)>,
    /// Members in declaration order.
    pub members: Vec<MemberRecord>,
}

/// One record yielded by a primitive source.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A point.
    Node(NodeRecord),
    /// A path.
    Way(WayRecord),
    /// A grouping.
    Relation(RelationRecord),
    /// A record the codec could not classify; skipped by the pass.
    Unrecognized {
        /// Codec-specific description of the record kind.
        kind: String,
    },
}

impl Primitive {
    /// Short name of the record kind, used in log lines.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Node(_) => "node",
            Self::Way(_) => "way",
            Self::Relation(_) => "relation",
            Self::Unrecognized { kind } => kind,
        }
    }
}
