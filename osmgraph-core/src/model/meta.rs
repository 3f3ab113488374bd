//! Authorship and versioning metadata shared by every entity kind.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

/// The author of an entity version.
///
/// Within one decode pass every entity written by the same author holds the
/// same `Arc<User>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    /// OSM user identifier.
    pub id: u32,
    /// Display name at the time of the edit.
    pub name: String,
}

impl User {
    /// Construct a user.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Edit time of an entity version, keyed by its raw encoded value.
///
/// # Examples
/// ```
/// use osmgraph_core::Timestamp;
///
/// let ts = Timestamp::from_millis(1_700_000_000_000);
/// assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: i64,
    time: DateTime<Utc>,
}

impl Timestamp {
    /// Build a timestamp from milliseconds since the Unix epoch.
    ///
    /// Values outside chrono's representable range collapse to the epoch
    /// while keeping their raw value.
    #[must_use]
    pub fn from_millis(raw: i64) -> Self {
        let time = DateTime::from_timestamp_millis(raw).unwrap_or_default();
        Self { raw, time }
    }

    /// The raw value this timestamp was decoded from.
    #[must_use]
    pub const fn raw(&self) -> i64 {
        self.raw
    }

    /// The decoded UTC time.
    #[must_use]
    pub const fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// RFC 3339 rendering with second precision.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Header common to nodes, ways and relations.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Entity version.
    pub version: u32,
    /// Time of the edit that produced this version.
    pub timestamp: Arc<Timestamp>,
    /// Changeset containing the edit.
    pub changeset: i64,
    /// Whether the entity is visible in this version.
    pub visible: bool,
    /// Author of the edit.
    pub user: Arc<User>,
}
