//! Source extraction
//!
//! Locates `corpus_root/<category>/<file_name>` and returns the recorded line
//! range with original line numbers. Every failure here is local to one
//! excerpt: the caller reports it and carries on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::query::FunctionRecord;

/// Errors that abort a single extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// `total` is `None` when the range was rejected before the file was read
    #[error("Line numbers ({start_line}-{end_line}) are out of range for file {}{}", .path.display(), line_count(.total))]
    OutOfRange {
        path: PathBuf,
        start_line: i64,
        end_line: i64,
        total: Option<usize>,
    },

    #[error("Source code file not found at '{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error("Source path '{}' resolves outside the corpus root", .0.display())]
    OutsideCorpus(PathBuf),

    #[error("An error occurred while reading {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// One line of source with its 1-based number in the original file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

/// A fully materialized line range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExcerpt {
    pub path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub lines: Vec<SourceLine>,
}

impl SourceExcerpt {
    /// Base name of the source file
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A function record together with the file it points into
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFunction {
    pub function: FunctionRecord,
    pub path: PathBuf,
}

/// Extracts function bodies from a corpus laid out as `root/<category>/<file>`
#[derive(Debug, Clone)]
pub struct SourceExtractor {
    corpus_root: PathBuf,
}

impl SourceExtractor {
    pub fn new(corpus_root: impl Into<PathBuf>) -> Self {
        Self { corpus_root: corpus_root.into() }
    }

    /// Attach the corpus path to a function record
    pub fn resolve(&self, function: FunctionRecord) -> ResolvedFunction {
        let path = self.corpus_root.join(&function.category).join(&function.name);
        ResolvedFunction { function, path }
    }

    pub fn extract(&self, resolved: &ResolvedFunction) -> Result<SourceExcerpt, ExtractError> {
        let function = &resolved.function;
        extract_range(
            &self.corpus_root,
            &function.category,
            &function.name,
            function.start_line,
            function.end_line,
        )
    }
}

/// Read `start_line..=end_line` (1-based) of `corpus_root/category/file_name`.
///
/// The file is decoded leniently: invalid UTF-8 becomes U+FFFD instead of
/// failing the read. The resolved path must stay under `corpus_root`.
pub fn extract_range(
    corpus_root: &Path,
    category: &str,
    file_name: &str,
    start_line: i64,
    end_line: i64,
) -> Result<SourceExcerpt, ExtractError> {
    let candidate = corpus_root.join(category).join(file_name);
    if start_line < 1 || end_line < start_line {
        return Err(ExtractError::OutOfRange {
            path: candidate,
            start_line,
            end_line,
            total: None,
        });
    }
    let path = contained_path(corpus_root, &candidate)?;

    let bytes = fs::read(&path).map_err(|e| io_error(&candidate, e))?;
    let content = String::from_utf8_lossy(&bytes);
    let lines = split_lines(&content);
    debug!("Read {} line(s) from {}", lines.len(), path.display());

    // 1 <= start_line <= end_line from here on
    let end_index = match usize::try_from(end_line) {
        Ok(end) if end <= lines.len() => end,
        _ => {
            return Err(ExtractError::OutOfRange {
                path: candidate,
                start_line,
                end_line,
                total: Some(lines.len()),
            });
        }
    };
    let start_index = end_index - (end_line - start_line) as usize - 1;
    let lines = lines[start_index..end_index]
        .iter()
        .enumerate()
        .map(|(offset, text)| SourceLine {
            number: start_index + offset + 1,
            text: text.trim_end().to_string(),
        })
        .collect();

    Ok(SourceExcerpt {
        path: candidate,
        start_line: start_index + 1,
        end_line: end_index,
        lines,
    })
}

/// Canonicalize `candidate` and require it to stay under `root`
fn contained_path(root: &Path, candidate: &Path) -> Result<PathBuf, ExtractError> {
    let root = root.canonicalize().map_err(|e| io_error(candidate, e))?;
    let resolved = candidate.canonicalize().map_err(|e| io_error(candidate, e))?;
    if !resolved.starts_with(&root) {
        return Err(ExtractError::OutsideCorpus(candidate.to_path_buf()));
    }
    Ok(resolved)
}

fn line_count(total: &Option<usize>) -> String {
    total.map(|n| format!(" ({} lines)", n)).unwrap_or_default()
}

fn io_error(path: &Path, source: io::Error) -> ExtractError {
    if source.kind() == io::ErrorKind::NotFound {
        ExtractError::FileNotFound(path.to_path_buf())
    } else {
        ExtractError::Io { path: path.to_path_buf(), source }
    }
}

/// Split on `\n`, `\r\n` and lone `\r`. A trailing terminator does not start
/// a new line.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(pos) => {
                lines.push(&rest[..pos]);
                let terminator = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn corpus(files: &[(&str, &str, &[u8])]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (category, name, content) in files {
            let sub = dir.path().join(category);
            fs::create_dir_all(&sub).unwrap();
            fs::write(sub.join(name), content).unwrap();
        }
        dir
    }

    const FIVE_LINES: &[u8] = b"one\ntwo  \nthree\nfour\nfive\n";

    #[test]
    fn test_single_line_range() {
        let dir = corpus(&[("5", "a.java", FIVE_LINES)]);
        for line in 1..=5 {
            let excerpt = extract_range(dir.path(), "5", "a.java", line, line).unwrap();
            assert_eq!(excerpt.lines.len(), 1);
            assert_eq!(excerpt.lines[0].number, line as usize);
        }
    }

    #[test]
    fn test_range_numbers_and_trims() {
        let dir = corpus(&[("5", "a.java", FIVE_LINES)]);
        let excerpt = extract_range(dir.path(), "5", "a.java", 2, 4).unwrap();
        let numbered: Vec<(usize, &str)> = excerpt.lines.iter().map(|l| (l.number, l.text.as_str())).collect();
        assert_eq!(numbered, vec![(2, "two"), (3, "three"), (4, "four")]);
        assert_eq!(excerpt.file_name(), "a.java");
    }

    #[test]
    fn test_end_past_eof_is_out_of_range() {
        let dir = corpus(&[("5", "a.java", FIVE_LINES)]);
        let err = extract_range(dir.path(), "5", "a.java", 4, 6).unwrap_err();
        assert!(matches!(err, ExtractError::OutOfRange { total: Some(5), .. }));
    }

    #[test]
    fn test_start_before_first_line_is_out_of_range() {
        let dir = corpus(&[("5", "a.java", FIVE_LINES)]);
        assert!(matches!(
            extract_range(dir.path(), "5", "a.java", 0, 2),
            Err(ExtractError::OutOfRange { total: None, .. })
        ));
        assert!(matches!(
            extract_range(dir.path(), "5", "a.java", 4, 3),
            Err(ExtractError::OutOfRange { start_line: 4, end_line: 3, total: None, .. })
        ));
    }

    #[test]
    fn test_extreme_line_numbers_are_rejected() {
        let dir = corpus(&[("5", "a.java", FIVE_LINES)]);
        for (start, end) in [(i64::MIN, 1), (-3, 2), (i64::MIN, i64::MIN), (0, 0)] {
            assert!(
                matches!(
                    extract_range(dir.path(), "5", "a.java", start, end),
                    Err(ExtractError::OutOfRange { total: None, .. })
                ),
                "range {start}-{end}"
            );
        }
        assert!(matches!(
            extract_range(dir.path(), "5", "a.java", 2, i64::MAX),
            Err(ExtractError::OutOfRange { total: Some(5), .. })
        ));
    }

    #[test]
    fn test_invalid_range_is_rejected_before_reading() {
        let dir = corpus(&[]);
        assert!(matches!(
            extract_range(dir.path(), "5", "missing.java", -1, 4),
            Err(ExtractError::OutOfRange { total: None, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = corpus(&[("5", "a.java", FIVE_LINES)]);
        let err = extract_range(dir.path(), "5", "missing.java", 1, 1).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound(p) if p.ends_with("5/missing.java")));
    }

    #[test]
    fn test_escape_from_corpus_is_rejected() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("dataset");
        fs::create_dir_all(root.join("5")).unwrap();
        fs::write(outer.path().join("secret.txt"), "hidden\n").unwrap();

        let err = extract_range(&root, "5", "../../secret.txt", 1, 1).unwrap_err();
        assert!(matches!(err, ExtractError::OutsideCorpus(_)));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = corpus(&[("9", "legacy.java", &b"ok\n\xff\xfeabc\nend\n"[..])]);
        let excerpt = extract_range(dir.path(), "9", "legacy.java", 2, 2).unwrap();
        assert!(excerpt.lines[0].text.contains('\u{FFFD}'));
        assert!(excerpt.lines[0].text.ends_with("abc"));
    }

    #[test]
    fn test_split_lines_universal_newlines() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_extractor_resolves_corpus_path() {
        let dir = corpus(&[("5", "123.java", FIVE_LINES)]);
        let mut rows = crate::ResultSet::new(
            ["ID", "NAME", "TYPE", "STARTLINE", "ENDLINE"].iter().map(|s| s.to_string()).collect(),
        );
        rows.push(vec![
            crate::Value::Integer(80378),
            crate::Value::Text("123.java".into()),
            crate::Value::Text("5".into()),
            crate::Value::Integer(1),
            crate::Value::Integer(2),
        ]);
        let function = FunctionRecord::from_record(&rows.rows()[0]).unwrap();

        let extractor = SourceExtractor::new(dir.path());
        let resolved = extractor.resolve(function);
        assert_eq!(resolved.path, dir.path().join("5").join("123.java"));

        let excerpt = extractor.extract(&resolved).unwrap();
        assert_eq!(excerpt.lines.len(), 2);
    }
}
