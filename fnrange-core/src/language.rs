//! Dialect detection
//!
//! Maps a file identifier to the syntax variant the parser must use.
//! Classification never fails: anything unrecognized is parsed as TypeScript.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Syntax variant used to parse a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// TypeScript (.ts), also the fallback for unknown extensions
    #[default]
    TypeScript,
    /// TypeScript with JSX (.tsx)
    #[serde(rename = "tsx")]
    TypeScriptReact,
    /// JavaScript (.js, .cjs, .mjs)
    JavaScript,
    /// JavaScript with JSX (.jsx)
    #[serde(rename = "jsx")]
    JavaScriptReact,
}

/// Extensions (without the dot) that file collection picks up
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

impl Dialect {
    /// Select the dialect for a file identifier (path, URL or bare name)
    ///
    /// Matching is case-insensitive on the suffix. Unrecognized suffixes fall
    /// back to [`Dialect::TypeScript`].
    pub fn from_file_name(file_name: &str) -> Self {
        let lowered = file_name.to_lowercase();

        if lowered.ends_with(".tsx") {
            Dialect::TypeScriptReact
        } else if lowered.ends_with(".ts") {
            Dialect::TypeScript
        } else if lowered.ends_with(".jsx") {
            Dialect::JavaScriptReact
        } else if lowered.ends_with(".js") || lowered.ends_with(".cjs") || lowered.ends_with(".mjs") {
            Dialect::JavaScript
        } else {
            Dialect::default()
        }
    }

    /// Select the dialect for a path; non UTF-8 paths use the default
    pub fn from_path(path: &Path) -> Self {
        path.to_str().map(Self::from_file_name).unwrap_or_default()
    }

    /// Canonical name of the dialect
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::TypeScript => "TypeScript",
            Dialect::TypeScriptReact => "TypeScript React",
            Dialect::JavaScript => "JavaScript",
            Dialect::JavaScriptReact => "JavaScript React",
        }
    }

    /// Check if this dialect accepts type annotations
    pub fn is_typescript(&self) -> bool {
        matches!(self, Dialect::TypeScript | Dialect::TypeScriptReact)
    }

    /// Check if this dialect accepts JSX markup
    ///
    /// Plain JavaScript accepts it too; only `.ts` uses the markup-free grammar.
    pub fn allows_jsx(&self) -> bool {
        !matches!(self, Dialect::TypeScript)
    }
}

/// Check if a file name is something file collection should extract
///
/// TypeScript declaration files (`.d.ts`) carry no function bodies and are skipped.
pub fn is_supported_source_file(file_name: &str) -> bool {
    let lowered = file_name.to_lowercase();
    if lowered.ends_with(".d.ts") {
        return false;
    }

    Path::new(&lowered)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_name_table() {
        assert_eq!(Dialect::from_file_name("app.tsx"), Dialect::TypeScriptReact);
        assert_eq!(Dialect::from_file_name("app.ts"), Dialect::TypeScript);
        assert_eq!(Dialect::from_file_name("app.jsx"), Dialect::JavaScriptReact);
        assert_eq!(Dialect::from_file_name("app.js"), Dialect::JavaScript);
        assert_eq!(Dialect::from_file_name("app.cjs"), Dialect::JavaScript);
        assert_eq!(Dialect::from_file_name("app.mjs"), Dialect::JavaScript);
    }

    #[test]
    fn test_from_file_name_is_case_insensitive() {
        assert_eq!(Dialect::from_file_name("App.TSX"), Dialect::TypeScriptReact);
        assert_eq!(Dialect::from_file_name("INDEX.JS"), Dialect::JavaScript);
        assert_eq!(Dialect::from_file_name("Widget.JsX"), Dialect::JavaScriptReact);
    }

    #[test]
    fn test_from_file_name_defaults_to_typescript() {
        assert_eq!(Dialect::from_file_name("README.md"), Dialect::TypeScript);
        assert_eq!(Dialect::from_file_name(""), Dialect::TypeScript);
        assert_eq!(Dialect::from_file_name("noext"), Dialect::TypeScript);
        assert_eq!(
            Dialect::from_file_name("https://example.com/bundle.js?v=3"),
            Dialect::TypeScript
        );
    }

    #[test]
    fn test_from_file_name_urls() {
        assert_eq!(
            Dialect::from_file_name("https://example.com/static/main.js"),
            Dialect::JavaScript
        );
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Dialect::from_path(Path::new("src/a.jsx")), Dialect::JavaScriptReact);
        assert_eq!(Dialect::from_path(Path::new("src/a.mts")), Dialect::TypeScript);
    }

    #[test]
    fn test_predicates() {
        assert!(Dialect::TypeScript.is_typescript());
        assert!(Dialect::TypeScriptReact.is_typescript());
        assert!(!Dialect::JavaScript.is_typescript());
        assert!(Dialect::JavaScriptReact.allows_jsx());
        assert!(Dialect::JavaScript.allows_jsx());
        assert!(!Dialect::TypeScript.allows_jsx());
        assert_eq!(Dialect::TypeScriptReact.name(), "TypeScript React");
    }

    #[test]
    fn test_is_supported_source_file() {
        assert!(is_supported_source_file("index.ts"));
        assert!(is_supported_source_file("index.mjs"));
        assert!(is_supported_source_file("Component.TSX"));
        assert!(!is_supported_source_file("types.d.ts"));
        assert!(!is_supported_source_file("main.go"));
        assert!(!is_supported_source_file("Makefile"));
    }
}
