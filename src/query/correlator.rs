//! Clone pair correlation
//!
//! Clone relationships are unordered: a pair stored as (A, B) is found by a
//! lookup for (B, A). The matching happens in SQL as a two-branch OR so a
//! pair lookup stays a single round trip.

use tracing::debug;
use crate::Result;
use crate::storage::schema::columns;
use crate::storage::{Record, ResultSet, SqliteStore};
use super::Lookup;

/// Typed view over a `CLONES` row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClonePairRecord {
    pub function_id_one: i64,
    pub function_id_two: i64,
    pub functionality_id: Option<i64>,
}

impl ClonePairRecord {
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            function_id_one: record.require_i64(columns::FUNCTION_ID_ONE)?,
            function_id_two: record.require_i64(columns::FUNCTION_ID_TWO)?,
            functionality_id: record.optional_i64(columns::FUNCTIONALITY_ID),
        })
    }

    /// True if the pair links `a` and `b`, in either order
    pub fn connects(&self, a: i64, b: i64) -> bool {
        (self.function_id_one == a && self.function_id_two == b)
            || (self.function_id_one == b && self.function_id_two == a)
    }

    /// The other side of the pair, if `id` is one side
    pub fn partner_of(&self, id: i64) -> Option<i64> {
        if self.function_id_one == id {
            Some(self.function_id_two)
        } else if self.function_id_two == id {
            Some(self.function_id_one)
        } else {
            None
        }
    }
}

/// Clone rows found for a lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ClonePairs {
    rows: ResultSet,
}

impl ClonePairs {
    pub fn new(rows: ResultSet) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &ResultSet {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Functionality id of the first pair, when the column is present
    pub fn functionality_id(&self) -> Option<i64> {
        self.rows
            .rows()
            .first()
            .and_then(|row| row.optional_i64(columns::FUNCTIONALITY_ID))
    }

    /// Typed pairs, one per row. A row whose function ids are not integers
    /// yields an error without affecting the others.
    pub fn pairs(&self) -> impl Iterator<Item = Result<ClonePairRecord>> + '_ {
        self.rows.rows().iter().map(ClonePairRecord::from_record)
    }

    /// Whether a readable row links `a` and `b`
    pub fn links(&self, a: i64, b: i64) -> bool {
        self.pairs().flatten().any(|pair| pair.connects(a, b))
    }
}

/// Finds clone pairs for a lookup
pub struct CloneCorrelator<'a> {
    store: &'a SqliteStore,
}

impl<'a> CloneCorrelator<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// All pairs touching a single id, or the specific pair between two ids
    pub fn find_pairs(&self, lookup: &Lookup) -> Result<ClonePairs> {
        let rows = self.store.clone_pair_rows(lookup)?;
        debug!("Found {} clone pair row(s) for {}", rows.len(), lookup);
        Ok(ClonePairs::new(rows))
    }
}
