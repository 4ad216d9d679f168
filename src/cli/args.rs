//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// drainage - Derive drainage networks from a DEM with SAGA GIS.
#[derive(Debug, Parser)]
#[command(name = "drainage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Extra config file, merged over .drainage/config.yml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output, including tool output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fill sinks, compute catchment area and extract the channel network
    Run(RunArgs),

    /// Show the algorithm's parameters and outputs
    Describe(DescribeArgs),

    /// List catchment area methods
    Methods(MethodsArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Check that the SAGA command-line runner is available
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Input DEM raster
    pub input: PathBuf,

    /// Minimum slope in degrees for the filled DEM [default: 0.01]
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub min_slope: Option<f64>,

    /// Catchment area method: index, name or alias (see `drainage methods`) [default: d8]
    #[arg(short = 'm', long, value_name = "METHOD")]
    pub catchment_method: Option<String>,

    /// Channel initiation threshold on catchment area [default: 1000]
    #[arg(short, long, value_name = "AREA", allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Filled DEM destination
    #[arg(long, value_name = "PATH")]
    pub filled: Option<String>,

    /// Flow direction destination
    #[arg(long, value_name = "PATH")]
    pub flow_dir: Option<String>,

    /// Catchment area destination
    #[arg(long, value_name = "PATH")]
    pub catchment: Option<String>,

    /// Channel network raster destination
    #[arg(long, value_name = "PATH")]
    pub channels_raster: Option<String>,

    /// Channel network vector destination
    #[arg(long, value_name = "PATH")]
    pub channels_vector: Option<String>,

    /// JSON or YAML file with a parameter map (INPUT, MINSLOPE, ...)
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Directory relative destinations are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Keep intermediate layers written to the temporary directory
    #[arg(long)]
    pub keep_temp: bool,

    /// Print tool command lines without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print a JSON run report instead of text
    #[arg(long)]
    pub json: bool,

    /// Plain output without spinners
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `describe` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DescribeArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `methods` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MethodsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long, conflicts_with_all = ["yaml", "schema"])]
    pub json: bool,

    /// Output as YAML (default)
    #[arg(long, conflicts_with = "schema")]
    pub yaml: bool,

    /// Print the JSON Schema of the config file
    #[arg(long)]
    pub schema: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
