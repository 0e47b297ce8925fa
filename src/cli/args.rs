//! Command-line arguments

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::analyze::AnalyzeArgs;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::config::ConfigCommands;
use crate::cli::commands::lineup::LineupArgs;
use crate::cli::commands::rollup::RollupArgs;
use crate::cli::commands::whatif::WhatifArgs;

#[derive(Parser, Debug)]
#[command(
    name = "lineup",
    version,
    about = "Chassis lineup analyzer - damper lengths, clip rankings and clip assignment from hardpoint surveys",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Column mapping file (.yaml, .yml or .json)
    #[arg(long, short = 'm', global = true, env = "LINEUP_MAPPING")]
    pub mapping: Option<PathBuf>,

    /// Unified survey CSV carrying all four corners
    #[arg(long, short = 'd', global = true, conflicts_with_all = ["front", "rear"])]
    pub data: Option<PathBuf>,

    /// Front clip survey CSV (LF/RF corners)
    #[arg(long, global = true, requires = "rear")]
    pub front: Option<PathBuf>,

    /// Rear clip survey CSV (LR/RR corners)
    #[arg(long, global = true, requires = "front")]
    pub rear: Option<PathBuf>,

    /// Keep raw LCA heights instead of normalizing them to the batch median
    #[arg(long, global = true)]
    pub no_normalize: bool,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "auto")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress warnings and status lines
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank every clip combination in the survey
    Analyze(AnalyzeArgs),

    /// Mean ranks and lengths grouped by center section or clip
    Rollup(RollupArgs),

    /// Assign clips to center sections with the greedy optimizer
    Lineup(LineupArgs),

    /// Compare every clip measured at one center section with its assigned clip
    #[command(name = "whatif")]
    WhatIf(WhatifArgs),

    /// Column mapping management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated for lists, YAML for single documents
    #[default]
    Auto,
    /// Tab-separated values
    Tsv,
    /// Comma-separated values
    Csv,
    /// Markdown table
    Md,
    /// Boxed table for the terminal
    Table,
    /// JSON
    Json,
    /// YAML
    Yaml,
}
