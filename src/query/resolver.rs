//! Function resolution
//!
//! Fetches `FUNCTIONS` rows for one or two ids and indexes them by id.
//! Absent ids are not an error; they are simply missing from the lookup.

use std::collections::HashMap;
use tracing::{debug, warn};
use crate::Result;
use crate::storage::schema::columns;
use crate::storage::{Record, ResultSet, SqliteStore};
use super::Lookup;

/// Typed view over a `FUNCTIONS` row.
///
/// Only the columns needed to locate the source are typed; the full row is
/// kept for display.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRecord {
    pub id: i64,
    /// Source file base name
    pub name: String,
    /// Corpus sub-directory (the `TYPE` column)
    pub category: String,
    /// First line, 1-based
    pub start_line: i64,
    /// Last line, inclusive
    pub end_line: i64,
    pub record: Record,
}

impl FunctionRecord {
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.require_i64(columns::ID)?,
            name: record.require_text(columns::NAME)?,
            category: record.require_text(columns::TYPE)?,
            start_line: record.require_i64(columns::START_LINE)?,
            end_line: record.require_i64(columns::END_LINE)?,
            record: record.clone(),
        })
    }
}

/// Function rows plus an id index into them
#[derive(Debug, Clone)]
pub struct FunctionLookup {
    rows: ResultSet,
    by_id: HashMap<i64, usize>,
}

impl FunctionLookup {
    pub fn from_rows(rows: ResultSet) -> Self {
        let mut by_id = HashMap::new();
        for (idx, row) in rows.rows().iter().enumerate() {
            match row.optional_i64(columns::ID) {
                Some(id) => {
                    by_id.entry(id).or_insert(idx);
                }
                None => warn!("Skipping function row {} without an integer ID", idx),
            }
        }
        Self { rows, by_id }
    }

    /// All fetched rows, for rendering
    pub fn rows(&self) -> &ResultSet {
        &self.rows
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.by_id.get(&id).map(|&idx| &self.rows.rows()[idx])
    }

    pub fn contains(&self, id: i64) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Requested ids that did not resolve, in input order
    pub fn missing(&self, lookup: &Lookup) -> Vec<i64> {
        lookup.ids().into_iter().filter(|id| !self.contains(*id)).collect()
    }

    /// Typed record for an id; `None` when the id did not resolve
    pub fn function(&self, id: i64) -> Option<Result<FunctionRecord>> {
        self.get(id).map(FunctionRecord::from_record)
    }
}

/// Resolves function ids against the store
pub struct FunctionResolver<'a> {
    store: &'a SqliteStore,
}

impl<'a> FunctionResolver<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Fetch the function rows for a lookup with a single query
    pub fn resolve(&self, lookup: &Lookup) -> Result<FunctionLookup> {
        let rows = self.store.function_rows(lookup)?;
        let functions = FunctionLookup::from_rows(rows);
        debug!("Resolved {} of {} function id(s) for {}", functions.len(), lookup.ids().len(), lookup);
        Ok(functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.connection().execute_batch(
            r#"
            INSERT INTO FUNCTIONS (ID, NAME, TYPE, STARTLINE, ENDLINE, NORMALIZED_SIZE, TOKENS)
                VALUES (80378, '123.java', '5', 10, 20, 11, 96);
            INSERT INTO FUNCTIONS (ID, NAME, TYPE, STARTLINE, ENDLINE)
                VALUES (18548122, 'Other.java', '42', 3, 8);
            "#,
        ).unwrap();
        store
    }

    #[test]
    fn test_resolve_single_keeps_all_columns() {
        let store = store();
        let functions = FunctionResolver::new(&store).resolve(&Lookup::Single(80378)).unwrap();

        assert_eq!(functions.len(), 1);
        let row = functions.get(80378).unwrap();
        assert_eq!(row.columns().len(), 7);
        assert_eq!(row.optional_i64("TOKENS"), Some(96));

        let record = functions.function(80378).unwrap().unwrap();
        assert_eq!(record.name, "123.java");
        assert_eq!(record.category, "5");
        assert_eq!((record.start_line, record.end_line), (10, 20));
    }

    #[test]
    fn test_resolve_absent_id_is_empty() {
        let store = store();
        let functions = FunctionResolver::new(&store).resolve(&Lookup::Single(1)).unwrap();
        assert!(functions.is_empty());
        assert!(functions.function(1).is_none());
        assert_eq!(functions.missing(&Lookup::Single(1)), vec![1]);
    }

    #[test]
    fn test_resolve_pair_reports_missing_in_order() {
        let store = store();
        let resolver = FunctionResolver::new(&store);

        let both = resolver.resolve(&Lookup::Pair(18548122, 80378)).unwrap();
        assert_eq!(both.len(), 2);
        assert!(both.missing(&Lookup::Pair(18548122, 80378)).is_empty());

        let lookup = Lookup::Pair(999999999, 80378);
        let partial = resolver.resolve(&lookup).unwrap();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial.missing(&lookup), vec![999999999]);
    }

    #[test]
    fn test_function_record_requires_location_columns() {
        let mut rows = ResultSet::new(vec!["ID".into(), "NAME".into()]);
        rows.push(vec![crate::Value::Integer(1), crate::Value::Text("a.java".into())]);
        let functions = FunctionLookup::from_rows(rows);

        let err = functions.function(1).unwrap().unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == "TYPE"));
    }
}
