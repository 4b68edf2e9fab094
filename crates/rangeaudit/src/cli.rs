use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rangeaudit", version, about = "Range-mode dependency vulnerability constraint auditor", long_about = None)]
pub struct Cli {
    /// Path to the project directory containing pyproject.toml
    #[arg(default_value = ".")]
    pub project_path: PathBuf,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Exit with status 1 when any finding or unsatisfiable envelope is present
    #[arg(long)]
    pub range_strict: bool,

    /// Include each finding's vulnerability description in the output
    #[arg(long)]
    pub desc: bool,

    /// Include each finding's alternate identifiers in the output
    #[arg(long)]
    pub aliases: bool,

    /// Admit prereleases into the overlap check even when the envelope doesn't
    #[arg(long)]
    pub include_prereleases: bool,

    /// Directory used to cache registry and advisory HTTP responses
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Per-request network timeout, in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,

    /// Base URL for the OSV advisory query endpoint's ecosystem
    #[arg(long, default_value = "PyPI")]
    pub ecosystem: String,

    /// Maximum transitive-dependency traversal depth
    #[arg(long, default_value_t = 10)]
    pub max_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}
