//! Configuration file schema.
//!
//! ```yaml
//! toolbox:
//!   executable: saga_cmd
//!   timeout_secs: 3600
//!   keep_temporary: false
//!   env:
//!     SAGA_TLB: /opt/saga/tools
//! defaults:
//!   min_slope: 0.01
//!   catchment_method: d8
//!   threshold: 1000
//! channels:
//!   initiation: greater_than
//!   max_divergence_cells: 10
//!   min_segment_length: 10
//! output:
//!   directory: results
//!   mode: normal
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::algorithm::CatchmentMethod;

/// Root of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct DrainageConfig {
    /// How delegated tools are executed.
    pub toolbox: ToolboxConfig,

    /// Parameter defaults used when a run does not set them.
    pub defaults: DefaultsConfig,

    /// Fixed settings of the channel-network stage.
    pub channels: ChannelsConfig,

    /// Where and how results are reported.
    pub output: OutputConfig,
}

/// Toolbox execution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ToolboxConfig {
    /// Name or path of the SAGA command-line runner.
    pub executable: String,

    /// Kill a tool that runs longer than this many seconds.
    pub timeout_secs: Option<u64>,

    /// Extra environment variables for tool processes.
    pub env: HashMap<String, String>,

    /// Keep the scratch directory even when no result lives in it.
    pub keep_temporary: bool,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            executable: "saga_cmd".to_string(),
            timeout_secs: None,
            env: HashMap::new(),
            keep_temporary: false,
        }
    }
}

/// Defaults for algorithm parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Minimum slope in degrees for the filled DEM.
    pub min_slope: Option<f64>,

    /// Catchment routing method, by alias (`mfd`) or index (`4`).
    #[schemars(with = "Option<String>")]
    pub catchment_method: Option<CatchmentMethod>,

    /// Channel initiation threshold.
    pub threshold: Option<f64>,
}

/// How the initiation grid is compared with the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InitiationMethod {
    LessThan,
    Equals,
    #[default]
    GreaterThan,
}

impl InitiationMethod {
    /// Index the channel-network tool expects.
    pub fn index(self) -> i64 {
        match self {
            Self::LessThan => 0,
            Self::Equals => 1,
            Self::GreaterThan => 2,
        }
    }
}

/// Channel-network stage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelsConfig {
    /// Initiation comparison.
    pub initiation: InitiationMethod,

    /// Tracing: maximum divergence in cells.
    pub max_divergence_cells: u32,

    /// Minimum channel segment length in cells.
    pub min_segment_length: u32,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            initiation: InitiationMethod::GreaterThan,
            max_divergence_cells: 10,
            min_segment_length: 10,
        }
    }
}

/// Output verbosity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    Normal,
    Quiet,
    Silent,
}

/// Result placement and reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Base directory for relative output destinations.
    pub directory: Option<PathBuf>,

    /// Default output verbosity.
    pub mode: Option<OutputMode>,
}
