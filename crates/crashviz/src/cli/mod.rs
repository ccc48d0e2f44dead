//! Command-line interface for crashviz.
//!
//! This module provides the CLI structure and the interactive session used
//! by the `crashviz` binary.

mod commands;
pub mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, InteractiveCommand, OutputFormat, RenderCommand, SummaryCommand};

/// crashviz - Chart a history of airplane crashes
///
/// Renders a bar chart of crashes per year, or of fatalities per operator
/// within one year, from a crash CSV file.
#[derive(Debug, Parser)]
#[command(name = "crashviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Crash CSV file (overrides `data.path` from configuration)
    #[arg(short, long, global = true, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render one chart as SVG or draw commands
    Render(RenderCommand),

    /// Print the yearly or operator table
    Summary(SummaryCommand),

    /// Drive the chart with commands read from stdin
    Interactive(InteractiveCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Whether the command needs the crash dataset.
    #[must_use]
    pub fn needs_data(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}
