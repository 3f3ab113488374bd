//! Per-pass interning of users and timestamps.
//!
//! Large extracts repeat a small set of authors and edit times millions of
//! times. The interner hands out one `Arc` per distinct key so entities
//! share it instead of carrying their own copy.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{Timestamp, User};

/// User and timestamp tables for one decode pass.
#[derive(Debug, Default)]
pub struct Interner {
    users: HashMap<u32, Arc<User>>,
    timestamps: HashMap<i64, Arc<Timestamp>>,
}

impl Interner {
    /// Create empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the user stored for `id`, inserting one named `name` if absent.
    ///
    /// The first name seen for an id wins.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use osmgraph_core::Interner;
    ///
    /// let mut interner = Interner::new();
    /// let first = interner.user(5, "bob");
    /// let second = interner.user(5, "bob");
    /// assert!(Arc::ptr_eq(&first, &second));
    /// ```
    pub fn user(&mut self, id: u32, name: &str) -> Arc<User> {
        Arc::clone(
            self.users
                .entry(id)
                .or_insert_with(|| Arc::new(User::new(id, name))),
        )
    }

    /// Return the timestamp stored for `raw`, inserting it if absent.
    pub fn timestamp(&mut self, raw: i64) -> Arc<Timestamp> {
        Arc::clone(
            self.timestamps
                .entry(raw)
                .or_insert_with(|| Arc::new(Timestamp::from_millis(raw))),
        )
    }

    /// Number of distinct users seen.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of distinct timestamps seen.
    #[must_use]
    pub fn timestamp_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Release the tables.
    #[must_use]
    pub fn into_tables(self) -> (HashMap<u32, Arc<User>>, HashMap<i64, Arc<Timestamp>>) {
        (self.users, self.timestamps)
    }
}
