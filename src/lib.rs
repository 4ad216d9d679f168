//! drainage - Derive a drainage network from a DEM with SAGA GIS.
//!
//! The crate chains three SAGA terrain-analysis tools: fill sinks (Wang &
//! Liu), catchment area and channel network. Each tool's outputs feed the
//! next, and the filled DEM, flow direction, catchment area and channel
//! network (raster and vector) come back as named outputs.
//!
//! # Modules
//!
//! - [`algorithm`] - Algorithm identity, parameter schema and validation
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`context`] - Working directory and output destinations for a run
//! - [`error`] - Error types and result aliases
//! - [`feedback`] - Progress reporting and cancellation
//! - [`process`] - External process execution
//! - [`runner`] - The three-stage drainage pipeline
//! - [`toolbox`] - Delegated SAGA tools
//! - [`ui`] - Spinners, themes, and terminal output
//!
//! # Example
//!
//! ```
//! use drainage::algorithm::DrainageParameters;
//! use drainage::config::ChannelsConfig;
//! use drainage::context::ProcessingContext;
//! use drainage::feedback::RecordingFeedback;
//! use drainage::runner::DrainagePipeline;
//! use drainage::toolbox::RecordingToolbox;
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("dem.sdat"), b"").unwrap();
//!
//! let toolbox = RecordingToolbox::new();
//! let feedback = RecordingFeedback::new();
//! let mut ctx = ProcessingContext::new(dir.path());
//!
//! let outcome = DrainagePipeline::new(&toolbox, ChannelsConfig::default())
//!     .run(&DrainageParameters::new("dem.sdat"), &mut ctx, &feedback)
//!     .unwrap();
//!
//! assert_eq!(outcome.into_results().len(), 5);
//! assert_eq!(feedback.texts().last().map(String::as_str), Some("Channel network computed"));
//! ```

pub mod algorithm;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod feedback;
pub mod process;
pub mod runner;
pub mod toolbox;
pub mod ui;

pub use error::{DrainageError, Result};
