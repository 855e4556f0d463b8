//! Configuration file support for fnrange
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.fnrangerc.json` in project root
//! 3. `fnrange.config.json` in project root
//! 4. `"fnrange"` key in `package.json`
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::naming::NamingMode;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default exclude patterns applied when no excludes are configured
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/bower_components/**",
    "**/*.d.ts",
    "**/*.d.mts",
    "**/*.d.cts",
];

/// fnrange configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FnrangeConfig {
    /// Glob patterns for files to include (default: all supported extensions)
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns for files to exclude (default: dependencies and declaration files)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Constructor label format (default: `default`)
    #[serde(default)]
    pub naming_mode: Option<NamingMode>,
}

/// Resolved configuration with compiled glob patterns
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Compiled include patterns (None means include all)
    pub include: Option<GlobSet>,
    /// Compiled exclude patterns
    pub exclude: GlobSet,
    pub naming_mode: NamingMode,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl FnrangeConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        for (field, patterns) in [("include", &self.include), ("exclude", &self.exclude)] {
            for pattern in patterns {
                if pattern.trim().is_empty() {
                    anyhow::bail!("{} patterns must not be empty", field);
                }
                Glob::new(pattern)
                    .with_context(|| format!("invalid {} pattern: {}", field, pattern))?;
            }
        }

        Ok(())
    }

    /// Resolve config into compiled form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let include = if self.include.is_empty() {
            None
        } else {
            Some(build_globset(self.include.iter().map(String::as_str))?)
        };

        // User excludes replace the defaults
        let exclude = if self.exclude.is_empty() {
            build_globset(DEFAULT_EXCLUDES.iter().copied())?
        } else {
            build_globset(self.exclude.iter().map(String::as_str))?
        };

        Ok(ResolvedConfig {
            include,
            exclude,
            naming_mode: self.naming_mode.unwrap_or_default(),
            config_path: None,
        })
    }
}

fn build_globset<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

impl ResolvedConfig {
    /// Check if a file path should be included based on include/exclude patterns
    pub fn should_include(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if self.exclude.is_match(path_str.as_ref()) {
            return false;
        }

        if let Some(ref include) = self.include {
            return include.is_match(path_str.as_ref());
        }

        true
    }

    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        FnrangeConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.fnrangerc.json`
/// 2. `fnrange.config.json`
/// 3. `"fnrange"` key in `package.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(FnrangeConfig, PathBuf)>> {
    for name in [".fnrangerc.json", "fnrange.config.json"] {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    let pkg_path = project_root.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<FnrangeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: FnrangeConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load config from the "fnrange" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<FnrangeConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("fnrange") {
        Some(value) => {
            let config: FnrangeConfig = serde_json::from_value(value.clone())
                .with_context(|| format!("invalid fnrange config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid fnrange config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        (load_config_file(path)?, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (FnrangeConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    tracing::debug!(
        config = ?resolved.config_path,
        naming_mode = resolved.naming_mode.as_str(),
        "resolved configuration"
    );
    Ok(resolved)
}
