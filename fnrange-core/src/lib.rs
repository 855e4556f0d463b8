//! fnrange core library - names every function in TypeScript and JavaScript
//! source and reports its line/column range

// Global invariants enforced in this crate:
// - Extraction is strictly per-file
// - No global mutable state
// - Deterministic traversal order must be explicit
// - Identical input yields identical output
// - Parse failures are reported, never masked

pub mod ast;
pub mod config;
pub mod discover;
pub mod language;
pub mod lower;
pub mod naming;
pub mod parser;
pub mod position;
pub mod range;
pub mod report;

pub use config::ResolvedConfig;
pub use language::Dialect;
pub use naming::NamingMode;
pub use position::{translate, Position};
pub use range::{NamedRange, RangeError};
pub use report::{render_json, render_jsonl, render_text, sort_results, FileRanges};

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use swc_common::{sync::Lrc, SourceMap};

/// Options for a single extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub naming_mode: NamingMode,
}

impl From<&ResolvedConfig> for ExtractOptions {
    fn from(config: &ResolvedConfig) -> Self {
        ExtractOptions {
            naming_mode: config.naming_mode,
        }
    }
}

/// Extract named ranges from source text with default options
///
/// The first range is always `globalCode: <file_identifier>` covering the
/// whole text, followed by every function-like construct in document order.
pub fn extract_named_ranges(file_identifier: &str, source: &str) -> Result<Vec<NamedRange>> {
    extract_named_ranges_with(file_identifier, source, &ExtractOptions::default())
}

/// Extract named ranges from source text
///
/// The dialect is chosen from `file_identifier`'s extension.
pub fn extract_named_ranges_with(
    file_identifier: &str,
    source: &str,
    options: &ExtractOptions,
) -> Result<Vec<NamedRange>> {
    let started = Instant::now();
    let dialect = Dialect::from_file_name(file_identifier);

    // The swc tree is built and dropped on the same large stack
    let tree = parser::with_syntax_stack(|| -> Result<ast::SyntaxTree> {
        let cm: Lrc<SourceMap> = Default::default();
        let parsed = parser::parse_source(source, &cm, file_identifier, dialect)?;
        Ok(lower::lower_program(
            &parsed.program,
            source,
            parsed.file.start_pos,
        ))
    })?;
    let ranges =
        discover::discover_named_ranges(&tree, source, file_identifier, options.naming_mode)?;

    tracing::debug!(
        file = file_identifier,
        dialect = dialect.name(),
        nodes = tree.len(),
        ranges = ranges.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "extracted named ranges"
    );

    Ok(ranges)
}

/// Read a file and extract its named ranges
///
/// The path as given is used as the file identifier.
pub fn extract_file(path: &Path, options: &ExtractOptions) -> Result<FileRanges> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file = path.to_string_lossy().into_owned();
    let ranges = extract_named_ranges_with(&file, &src, options)?;

    Ok(FileRanges {
        dialect: Dialect::from_file_name(&file),
        file,
        ranges,
    })
}

/// Extract every supported file under `path` (a file or a directory)
///
/// Files are extracted in parallel. Files that cannot be read or parsed are
/// skipped with a warning. Results are sorted by file path.
pub fn extract_path(path: &Path, config: &ResolvedConfig) -> Result<Vec<FileRanges>> {
    let options = ExtractOptions::from(config);
    let files: Vec<PathBuf> = collect_source_files(path)?
        .into_iter()
        .filter(|file| config.should_include(relative_to(file, path)))
        .collect();

    tracing::info!(files = files.len(), root = %path.display(), "extracting");

    let outcomes: Vec<(PathBuf, Result<FileRanges>)> = files
        .into_par_iter()
        .map(|file| {
            let outcome = extract_file(&file, &options);
            (file, outcome)
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut skipped_files: usize = 0;
    for (file, outcome) in outcomes {
        match outcome {
            Ok(ranges) => results.push(ranges),
            Err(e) => {
                tracing::warn!("skipping file {}: {:#}", file.display(), e);
                skipped_files += 1;
            }
        }
    }
    if skipped_files > 0 {
        tracing::warn!("skipped {} file(s) due to extraction errors", skipped_files);
    }

    Ok(sort_results(results))
}

/// Path used for include/exclude matching: relative to the root when possible
fn relative_to<'a>(file: &'a Path, root: &Path) -> &'a Path {
    match file.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative,
        _ => file,
    }
}

/// Collect all supported source files from a path (file or directory)
///
/// Extensions: .ts, .tsx, .mts, .cts, .js, .jsx, .mjs, .cjs (excluding .d.ts)
pub fn collect_source_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            if language::is_supported_source_file(filename) {
                files.push(path.to_path_buf());
            }
        }
    } else if path.is_dir() {
        collect_source_files_recursive(path, &mut files)?;
    } else {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    // Sort files for deterministic order
    files.sort();

    Ok(files)
}

/// Returns true for directory names that should not be traversed
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.')
        || name == "node_modules"
        || name == "dist"
        || name == "build"
        || name == "target"
}

/// Process one directory entry, pushing source files or recursing into dirs
fn process_dir_entry(path: PathBuf, metadata: std::fs::Metadata, files: &mut Vec<PathBuf>) -> Result<()> {
    if metadata.is_symlink() {
        return Ok(());
    }

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(());
    };

    if metadata.is_dir() {
        if !is_skipped_dir(name) {
            collect_source_files_recursive(&path, files)?;
        }
    } else if metadata.is_file() && language::is_supported_source_file(name) {
        files.push(path);
    }

    Ok(())
}

/// Recursively collect supported source files from a directory
fn collect_source_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry_result in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry_result?;
        let path = entry.path();
        let metadata = std::fs::symlink_metadata(&path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
        process_dir_entry(path, metadata, files)?;
    }

    Ok(())
}
