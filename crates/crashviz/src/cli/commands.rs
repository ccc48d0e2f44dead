//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Render command arguments.
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// First year of the yearly chart (non-numbers are ignored)
    #[arg(long, value_name = "YEAR")]
    pub start: Option<String>,

    /// Last year of the yearly chart (non-numbers are ignored)
    #[arg(long, value_name = "YEAR")]
    pub end: Option<String>,

    /// Show the operator chart for this year instead
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Operator whose tooltip is shown (operator chart only)
    #[arg(long, value_name = "OPERATOR", requires = "year")]
    pub hover: Option<String>,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "svg")]
    pub format: OutputFormat,
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// First year of the yearly table
    #[arg(long, value_name = "YEAR")]
    pub start: Option<String>,

    /// Last year of the yearly table
    #[arg(long, value_name = "YEAR")]
    pub end: Option<String>,

    /// Show the operators of this year instead
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Only list the N deadliest operators
    #[arg(short, long, value_name = "N", requires = "year")]
    pub top: Option<usize>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Interactive command arguments.
#[derive(Debug, Args)]
pub struct InteractiveCommand {
    /// SVG file rewritten after every redraw
    #[arg(short, long, value_name = "FILE", default_value = "crashviz.svg")]
    pub output: PathBuf,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Standalone SVG document
    #[default]
    Svg,
    /// Draw commands as JSON
    Json,
}
