//! fnrange CLI - function names and ranges for TypeScript and JavaScript

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output
// - Results go to stdout, diagnostics to stderr

use anyhow::Context;
use clap::{Parser, Subcommand};
use fnrange_core::config;
use fnrange_core::language::SUPPORTED_EXTENSIONS;
use fnrange_core::{extract_path, render_json, render_jsonl, render_text, NamingMode};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fnrange")]
#[command(about = "Name every function in TypeScript and JavaScript files and report its range")]
#[command(version = env!("FNRANGE_VERSION"))]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract named function ranges from a file or directory
    Extract {
        /// Path to source file or directory
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Constructor naming format (overrides config file)
        #[arg(long)]
        naming_mode: Option<NamingModeArg>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write output to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List the file extensions fnrange extracts
    Capabilities,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without running extraction
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Jsonl,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum NamingModeArg {
    Default,
    HeapSnapshot,
}

impl From<NamingModeArg> for NamingMode {
    fn from(arg: NamingModeArg) -> Self {
        match arg {
            NamingModeArg::Default => NamingMode::Default,
            NamingModeArg::HeapSnapshot => NamingMode::HeapSnapshot,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            path,
            format,
            naming_mode,
            config: config_path,
            output,
        } => {
            // Normalize path to absolute
            let normalized_path = if path.is_relative() {
                std::env::current_dir()?.join(&path)
            } else {
                path
            };

            if !normalized_path.exists() {
                anyhow::bail!("Path does not exist: {}", normalized_path.display());
            }

            let project_root = find_project_root(&normalized_path);
            let mut resolved_config =
                config::load_and_resolve(&project_root, config_path.as_deref())
                    .context("failed to load configuration")?;

            if let Some(config_path) = &resolved_config.config_path {
                tracing::info!("using config: {}", config_path.display());
            }

            // CLI flags override config file values
            if let Some(mode) = naming_mode {
                resolved_config.naming_mode = mode.into();
            }

            let results = extract_path(&normalized_path, &resolved_config)?;

            let rendered = match format {
                OutputFormat::Text => render_text(&results),
                OutputFormat::Json => format!("{}\n", render_json(&results)),
                OutputFormat::Jsonl => render_jsonl(&results),
            };

            match output {
                Some(output_path) => {
                    write_output(&output_path, &rendered)?;
                    tracing::info!("wrote {} file(s) to {}", results.len(), output_path.display());
                }
                None => print!("{}", rendered),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;

                println!("Configuration:");
                if let Some(ref p) = resolved.config_path {
                    println!("  Source: {}", p.display());
                } else {
                    println!("  Source: defaults (no config file found)");
                }
                println!();
                println!("Naming:");
                println!("  naming_mode: {}", resolved.naming_mode.as_str());
                println!();
                println!("Filters:");
                println!(
                    "  include: {}",
                    if resolved.include.is_some() {
                        "custom patterns"
                    } else {
                        "all files"
                    }
                );
                println!(
                    "  exclude: {} patterns",
                    if resolved.config_path.is_some() {
                        "custom"
                    } else {
                        "default"
                    }
                );
            }
        },
        Commands::Capabilities => {
            for ext in SUPPORTED_EXTENSIONS {
                println!(".{}", ext);
            }
        }
    }

    Ok(())
}

/// Install the stderr log subscriber
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Write output to file with atomic write pattern
fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}

/// Directory config discovery starts from
///
/// The nearest ancestor holding a `.git` directory or a `package.json`,
/// otherwise the path itself (or its parent for a file).
fn find_project_root(start_path: &Path) -> PathBuf {
    let start = if start_path.is_file() {
        start_path.parent().unwrap_or(start_path).to_path_buf()
    } else {
        start_path.to_path_buf()
    };

    start
        .ancestors()
        .find(|dir| dir.join(".git").exists() || dir.join("package.json").exists())
        .map(Path::to_path_buf)
        .unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract_flags() {
        let cli = Cli::try_parse_from([
            "fnrange",
            "-vv",
            "extract",
            "src",
            "--format",
            "jsonl",
            "--naming-mode",
            "heap-snapshot",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Extract {
                path,
                format,
                naming_mode,
                ..
            } => {
                assert_eq!(path, PathBuf::from("src"));
                assert!(matches!(format, OutputFormat::Jsonl));
                assert_eq!(naming_mode.map(NamingMode::from), Some(NamingMode::HeapSnapshot));
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_find_project_root_prefers_package_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("app/src")).unwrap();
        std::fs::write(dir.path().join("app/package.json"), "{}").unwrap();
        std::fs::write(dir.path().join("app/src/index.js"), "").unwrap();

        let root = find_project_root(&dir.path().join("app/src/index.js"));
        assert_eq!(root, dir.path().join("app"));
    }

    #[test]
    fn test_write_output_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out/ranges.json");
        write_output(&target, "[]\n").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "[]\n");
    }
}
