//! Expected benchmark schema
//!
//! The lookup never creates or migrates tables in a real database. These
//! statements describe the layout it expects and are used to build
//! in-memory fixtures.

/// Function metadata table
pub const FUNCTIONS_TABLE: &str = "FUNCTIONS";

/// Clone pair table
pub const CLONES_TABLE: &str = "CLONES";

/// Column names the lookup depends on
pub mod columns {
    pub const ID: &str = "ID";
    pub const NAME: &str = "NAME";
    pub const TYPE: &str = "TYPE";
    pub const START_LINE: &str = "STARTLINE";
    pub const END_LINE: &str = "ENDLINE";

    pub const FUNCTION_ID_ONE: &str = "FUNCTION_ID_ONE";
    pub const FUNCTION_ID_TWO: &str = "FUNCTION_ID_TWO";
    pub const FUNCTIONALITY_ID: &str = "FUNCTIONALITY_ID";
}

/// SQL to create the functions table
pub const CREATE_FUNCTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS FUNCTIONS (
    ID INTEGER PRIMARY KEY,
    NAME TEXT NOT NULL,
    TYPE TEXT NOT NULL,
    STARTLINE INTEGER NOT NULL,
    ENDLINE INTEGER NOT NULL,
    NORMALIZED_SIZE INTEGER,
    TOKENS INTEGER
)
"#;

/// SQL to create the clones table
pub const CREATE_CLONES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS CLONES (
    FUNCTION_ID_ONE INTEGER NOT NULL,
    FUNCTION_ID_TWO INTEGER NOT NULL,
    FUNCTIONALITY_ID INTEGER NOT NULL,
    TYPE INTEGER,
    SYNTACTIC_TYPE INTEGER,
    SIMILARITY_LINE REAL,
    SIMILARITY_TOKEN REAL
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_FUNCTIONS_TABLE, CREATE_CLONES_TABLE]
}
