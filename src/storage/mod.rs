//! Storage Layer - read-only SQLite access
//!
//! The benchmark database holds two tables:
//! - FUNCTIONS(ID, NAME, TYPE, STARTLINE, ENDLINE, ...)
//! - CLONES(FUNCTION_ID_ONE, FUNCTION_ID_TWO, FUNCTIONALITY_ID, ...)
//!
//! Results are returned as schema-agnostic `ResultSet`s.

pub mod result;
pub mod schema;
pub mod sqlite;

pub use result::{Record, ResultSet, Value};
pub use sqlite::{SqliteStore, locate_database};
