//! JSONL function lookup
//!
//! Some clone-detection datasets ship their functions as one JSON object per
//! line (`{"idx": ..., "func": ...}`). This scans such a file for an index.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde_json::Value;
use tracing::debug;
use crate::{Error, Result};

/// Field holding the record index
pub const INDEX_FIELD: &str = "idx";

/// Field holding the function source
pub const FUNC_FIELD: &str = "func";

/// Text form of an index value; strings are compared without quotes
fn index_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Return the `func` field of the first record whose `idx` equals `target`.
///
/// Indices are compared as text, so `"42"` and `42` match. Blank lines are
/// skipped. A malformed line, or a matching record whose `func` is absent or
/// null, is an error.
pub fn find_func(path: &Path, target: &str) -> Result<Option<String>> {
    let reader = BufReader::new(File::open(path)?);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record: Value = serde_json::from_str(&line)?;
        let Some(idx) = record.get(INDEX_FIELD) else {
            continue;
        };
        if index_text(idx) == target {
            debug!("Found index {} on line {}", target, line_no + 1);
            return match record.get(FUNC_FIELD) {
                None | Some(Value::Null) => Err(Error::MissingField {
                    line: line_no + 1,
                    field: FUNC_FIELD,
                }),
                Some(func) => Ok(Some(index_text(func))),
            };
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dataset(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_find_by_numeric_or_string_index() {
        let file = dataset(&[
            r#"{"idx": 1, "func": "void a() {}"}"#,
            "",
            r#"{"idx": "2", "func": "int b() { return 2; }"}"#,
        ]);
        assert_eq!(find_func(file.path(), "1").unwrap().as_deref(), Some("void a() {}"));
        assert_eq!(find_func(file.path(), "2").unwrap().as_deref(), Some("int b() { return 2; }"));
    }

    #[test]
    fn test_missing_index() {
        let file = dataset(&[r#"{"idx": 1, "func": "x"}"#, r#"{"func": "no index"}"#]);
        assert_eq!(find_func(file.path(), "7").unwrap(), None);
    }

    #[test]
    fn test_match_without_func_is_an_error() {
        let file = dataset(&[
            r#"{"idx": 1, "code": "void a() {}"}"#,
            r#"{"idx": 2, "func": null}"#,
            r#"{"idx": 3, "func": ""}"#,
        ]);
        assert!(matches!(
            find_func(file.path(), "1"),
            Err(Error::MissingField { line: 1, field: "func" })
        ));
        assert!(matches!(
            find_func(file.path(), "2"),
            Err(Error::MissingField { line: 2, .. })
        ));
        assert_eq!(find_func(file.path(), "3").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let file = dataset(&[r#"{"idx": 1"#]);
        assert!(matches!(find_func(file.path(), "1"), Err(crate::Error::Json(_))));
    }
}
