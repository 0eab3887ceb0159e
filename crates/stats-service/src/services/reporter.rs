//! Aggregator and reporter
//!
//! Read-only queries over the counters, ranked and rendered as text.

use std::collections::HashMap;
use std::fmt::Write as _;

use stats_core::{StatKind, StatScope};
use tracing::instrument;

use super::context::StatsContext;
use super::error::ServiceResult;

/// One ranked counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub name: String,
    pub count: i64,
}

/// Ranked counters of one scope and kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub scope: StatScope,
    pub kind: StatKind,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Build a report, ranking by count descending then name ascending
    pub fn from_counts(scope: StatScope, kind: StatKind, counts: HashMap<String, i64>) -> Self {
        let mut entries: Vec<ReportEntry> = counts
            .into_iter()
            .map(|(name, count)| ReportEntry { name, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        Self {
            scope,
            kind,
            entries,
        }
    }

    /// Ranked entries
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whole report as one body, one `* name: count` line per entry
    pub fn render(&self) -> String {
        render_entries(&self.entries)
    }

    /// Report split into bodies of at most `max_entries` entries each
    ///
    /// An empty report has no chunks. A zero limit is treated as one.
    pub fn chunks(&self, max_entries: usize) -> Vec<String> {
        self.entries
            .chunks(max_entries.max(1))
            .map(render_entries)
            .collect()
    }
}

fn render_entries(entries: &[ReportEntry]) -> String {
    let mut body = String::new();
    for entry in entries {
        let _ = writeln!(body, "* {}: {}", entry.name, entry.count);
    }
    body
}

/// Wrap a rendered body in a fenced code block
pub fn code_block(body: &str) -> String {
    format!("```\n{body}```")
}

/// Reporter
pub struct Reporter<'a> {
    ctx: &'a StatsContext,
}

impl<'a> Reporter<'a> {
    /// Create a new Reporter
    pub fn new(ctx: &'a StatsContext) -> Self {
        Self { ctx }
    }

    /// Ranked counters for one scope and kind; an empty scope is an empty report
    #[instrument(skip(self))]
    pub async fn report(&self, scope: StatScope, kind: StatKind) -> ServiceResult<Report> {
        let counts = self.ctx.store().hash_get_all(&scope.key(kind)).await?;
        Ok(Report::from_counts(scope, kind, counts))
    }
}
