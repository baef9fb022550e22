//! Report rendering
//!
//! Drives the lookup protocol against the store and writes the report:
//! - one id: the function row, then every clone pair touching it
//! - two ids: both function rows, the pair between them, then (only when
//!   both functions and the pair were found) each function's source range
//!
//! Missing rows, missing files and bad line ranges are written inline and
//! counted in the returned `ReportSummary`. Only store errors abort a run.

use std::io::Write;
use owo_colors::OwoColorize;
use tracing::{debug, warn};
use crate::Result;
use crate::extract::{SourceExcerpt, SourceExtractor};
use crate::query::{CloneCorrelator, ClonePairs, FunctionLookup, FunctionResolver, Lookup};
use crate::storage::schema::{CLONES_TABLE, FUNCTIONS_TABLE};
use crate::storage::{ResultSet, SqliteStore};
use crate::ui::{result_table, TableStyle, Theme};

/// Width of the rules framing a source excerpt
const RULE_WIDTH: usize = 60;

/// What a report run found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub functions_found: usize,
    /// Requested ids with no `FUNCTIONS` row, in input order
    pub missing_functions: Vec<i64>,
    pub pairs_found: usize,
    /// Clone rows whose function ids could not be read
    pub unreadable_pairs: usize,
    pub functionality_id: Option<i64>,
    pub excerpts_shown: usize,
    pub excerpt_failures: usize,
}

impl ReportSummary {
    /// Whether the source section was reached
    pub fn source_attempted(&self) -> bool {
        self.excerpts_shown + self.excerpt_failures > 0
    }
}

pub struct Reporter<'a, W: Write> {
    store: &'a SqliteStore,
    extractor: SourceExtractor,
    out: W,
    theme: Theme,
    style: TableStyle,
}

impl<'a, W: Write> Reporter<'a, W> {
    pub fn new(store: &'a SqliteStore, extractor: SourceExtractor, out: W) -> Self {
        Self {
            store,
            extractor,
            out,
            theme: Theme::plain(),
            style: TableStyle::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run the full lookup for one or two ids
    pub fn run(&mut self, lookup: &Lookup) -> Result<ReportSummary> {
        match *lookup {
            Lookup::Single(id) => self.run_single(id),
            Lookup::Pair(a, b) => self.run_pair(a, b),
        }
    }

    fn run_single(&mut self, id: i64) -> Result<ReportSummary> {
        let lookup = Lookup::Single(id);
        let mut summary = ReportSummary::default();

        let functions = FunctionResolver::new(self.store).resolve(&lookup)?;
        summary.functions_found = functions.len();
        summary.missing_functions = functions.missing(&lookup);
        self.table(&format!("Function {}", id), functions.rows())?;
        if !functions.contains(id) {
            self.notice(&format!("No function found with ID {}.", id))?;
        }
        writeln!(self.out)?;

        let pairs = CloneCorrelator::new(self.store).find_pairs(&lookup)?;
        summary.pairs_found = pairs.len();
        summary.functionality_id = pairs.functionality_id();
        self.table(&format!("Clone pairs involving function {}", id), pairs.rows())?;
        if pairs.is_empty() {
            self.notice(&format!("No clone pairs found for function {}.", id))?;
        } else {
            summary.unreadable_pairs = self.partners(id, &pairs)?;
        }

        Ok(summary)
    }

    fn run_pair(&mut self, a: i64, b: i64) -> Result<ReportSummary> {
        let lookup = Lookup::Pair(a, b);
        let mut summary = ReportSummary::default();

        let functions = FunctionResolver::new(self.store).resolve(&lookup)?;
        summary.functions_found = functions.len();
        summary.missing_functions = functions.missing(&lookup);
        self.table(&format!("Functions {}", lookup), functions.rows())?;
        for id in &summary.missing_functions {
            self.notice(&format!("No function found with ID {}.", id))?;
        }
        if !summary.missing_functions.is_empty() {
            self.notice("One or both functions not found.")?;
        }
        writeln!(self.out)?;

        let pairs = CloneCorrelator::new(self.store).find_pairs(&lookup)?;
        summary.pairs_found = pairs.len();
        summary.functionality_id = pairs.functionality_id();
        self.table(&format!("Clone pair between {} and {}", a, b), pairs.rows())?;
        if pairs.is_empty() {
            self.notice("No direct clone pair found between the two specified functions.")?;
        }

        if summary.missing_functions.is_empty() && pairs.links(a, b) {
            writeln!(self.out)?;
            self.sources(&lookup, &functions, &pairs, &mut summary)?;
        } else {
            debug!("Skipping source extraction for {}", lookup);
        }

        Ok(summary)
    }

    /// Render a single arbitrary query
    pub fn run_sql(&mut self, sql: &str) -> Result<usize> {
        let result = self.store.query(sql, [])?;
        self.table("Query", &result)?;
        Ok(result.len())
    }

    /// First rows of each benchmark table. A table that fails to load is
    /// reported and the other is still shown.
    pub fn preview(&mut self, limit: usize) -> Result<()> {
        for (idx, table) in [FUNCTIONS_TABLE, CLONES_TABLE].into_iter().enumerate() {
            if idx > 0 {
                writeln!(self.out)?;
            }
            match self.store.table_preview(table, limit) {
                Ok(result) => self.table(&format!("{} (first {})", table, limit), &result)?,
                Err(e) => {
                    warn!("Preview of {} failed: {}", table, e);
                    self.notice(&format!("{}: {}", table, e))?;
                }
            }
        }
        Ok(())
    }

    fn sources(
        &mut self,
        lookup: &Lookup,
        functions: &FunctionLookup,
        pairs: &ClonePairs,
        summary: &mut ReportSummary,
    ) -> Result<()> {
        let title = match pairs.functionality_id() {
            Some(functionality) => format!("Source code (functionality {})", functionality),
            None => "Source code".to_string(),
        };
        self.title(&title)?;

        for id in lookup.ids() {
            let function = match functions.function(id) {
                Some(Ok(function)) => function,
                Some(Err(e)) => {
                    summary.excerpt_failures += 1;
                    self.notice(&format!(
                        "Could not find a required column to locate source files: {}",
                        e
                    ))?;
                    continue;
                }
                None => {
                    summary.excerpt_failures += 1;
                    self.notice(&format!(
                        "Could not find details for function ID {} to display its source.",
                        id
                    ))?;
                    continue;
                }
            };

            let resolved = self.extractor.resolve(function);
            match self.extractor.extract(&resolved) {
                Ok(excerpt) => {
                    summary.excerpts_shown += 1;
                    self.excerpt(&excerpt)?;
                }
                Err(e) => {
                    summary.excerpt_failures += 1;
                    warn!(function = id, "{}", e);
                    self.notice(&format!("Error: {}", e))?;
                }
            }
        }
        Ok(())
    }

    /// Summarise the other side of every pair. Returns the number of rows
    /// skipped because their function ids are unreadable.
    fn partners(&mut self, id: i64, pairs: &ClonePairs) -> Result<usize> {
        let mut partners = Vec::new();
        let mut unreadable = 0;
        for pair in pairs.pairs() {
            match pair {
                Ok(pair) => partners.extend(pair.partner_of(id).map(|p| p.to_string())),
                Err(e) => {
                    unreadable += 1;
                    warn!(function = id, "Skipping clone pair row: {}", e);
                }
            }
        }

        writeln!(
            self.out,
            "{} clone partner(s): {}",
            partners.len(),
            partners.join(", ")
        )?;
        if unreadable > 0 {
            self.notice(&format!(
                "Skipped {} clone pair row(s) with unreadable function IDs.",
                unreadable
            ))?;
        }
        Ok(unreadable)
    }

    fn excerpt(&mut self, excerpt: &SourceExcerpt) -> Result<()> {
        let rule = "-".repeat(RULE_WIDTH);
        let rule = rule.style(self.theme.rule.clone());
        writeln!(self.out, "{}", rule)?;
        writeln!(
            self.out,
            "Displaying: {} (Lines {}-{})",
            excerpt.file_name(),
            excerpt.start_line,
            excerpt.end_line
        )?;
        writeln!(self.out, "{}", rule)?;
        for line in &excerpt.lines {
            let number = format!("{:4}", line.number);
            writeln!(self.out, "{}| {}", number.style(self.theme.gutter.clone()), line.text)?;
        }
        writeln!(self.out, "{}", rule)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn title(&mut self, title: &str) -> Result<()> {
        let line = format!("=== {} ===", title);
        writeln!(self.out, "{}", line.style(self.theme.title.clone()))?;
        Ok(())
    }

    fn table(&mut self, title: &str, result: &ResultSet) -> Result<()> {
        self.title(title)?;
        writeln!(self.out, "{}", result_table(result, self.style))?;
        Ok(())
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message.style(self.theme.notice.clone()))?;
        Ok(())
    }
}
