//! Per-file results and output rendering
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::language::Dialect;
use crate::range::NamedRange;
use serde::{Deserialize, Serialize};

/// Named ranges extracted from one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FileRanges {
    pub file: String,
    pub dialect: Dialect,
    pub ranges: Vec<NamedRange>,
}

impl FileRanges {
    /// Number of function-like ranges, excluding the global-code record
    pub fn function_count(&self) -> usize {
        self.ranges.len().saturating_sub(1)
    }
}

/// Sort results by file path
pub fn sort_results(mut results: Vec<FileRanges>) -> Vec<FileRanges> {
    results.sort_by(|a, b| a.file.cmp(&b.file));
    results
}

/// Render results as text output
///
/// One header line per file followed by one indented line per range.
pub fn render_text(results: &[FileRanges]) -> String {
    let mut output = String::new();

    for result in results {
        output.push_str(&format!(
            "{} ({}, {} functions)\n",
            result.file,
            result.dialect.name(),
            result.function_count()
        ));
        for range in &result.ranges {
            let span = format!(
                "{}:{}-{}:{}",
                range.start().line,
                range.start().column,
                range.end().line,
                range.end().column
            );
            output.push_str(&format!("  {:<16} {}\n", span, range.name()));
        }
    }

    output
}

/// Render results as a pretty-printed JSON array
pub fn render_json(results: &[FileRanges]) -> String {
    serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string())
}

/// Render results as JSON Lines, one file record per line
pub fn render_jsonl(results: &[FileRanges]) -> String {
    let mut output = String::new();
    for result in results {
        if let Ok(line) = serde_json::to_string(result) {
            output.push_str(&line);
            output.push('\n');
        }
    }
    output
}
