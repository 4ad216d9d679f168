//! Declarative parameter and output schema for the drainage algorithm.
//!
//! Each parameter describes its name, label and kind. Destination parameters
//! double as output declarations, the way the processing host treats them.

use serde::Serialize;

use super::destination::LayerKind;
use super::method::CatchmentMethod;

/// Parameter and output names.
pub mod names {
    pub const INPUT: &str = "INPUT";
    pub const MINSLOPE: &str = "MINSLOPE";
    pub const CATCHMENTMETHOD: &str = "CATCHMENTMETHOD";
    pub const THRESHOLD: &str = "THRESHOLD";
    pub const FILLED: &str = "FILLED";
    pub const FLOWDIR: &str = "FLOWDIR";
    pub const CATCHMENT: &str = "CATCHMENT";
    pub const CHANNELSRAST: &str = "CHANNELSRAST";
    pub const CHANNELSVECT: &str = "CHANNELSVECT";
}

/// Default minimum slope in degrees for the filled DEM.
pub const DEFAULT_MIN_SLOPE: f64 = 0.01;

/// Default channel initiation threshold.
pub const DEFAULT_THRESHOLD: f64 = 1000.0;

/// The kind of a parameter, determining which values it accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    /// An existing raster layer on disk.
    RasterLayer,
    /// Floating point value with optional lower bound.
    Number { default: f64, min: Option<f64> },
    /// Selection from a list of string options.
    Enum {
        options: &'static [&'static str],
        default: usize,
    },
    /// Where to write a raster output.
    RasterDestination,
    /// Where to write a vector output.
    VectorDestination,
}

impl ParameterKind {
    /// Whether the parameter is a destination (and therefore also an output).
    pub fn is_destination(&self) -> bool {
        matches!(self, Self::RasterDestination | Self::VectorDestination)
    }

    /// Layer kind of a destination parameter.
    pub fn layer_kind(&self) -> Option<LayerKind> {
        match self {
            Self::RasterDestination => Some(LayerKind::Raster),
            Self::VectorDestination => Some(LayerKind::Vector),
            _ => None,
        }
    }
}

/// Definition of a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: ParameterKind,
    pub required: bool,
}

/// An output produced by the algorithm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: LayerKind,
}

/// Identity and schema of a processing algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub group: &'static str,
    pub group_label: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterDefinition>,
}

impl AlgorithmDescriptor {
    /// The drainage-from-DEM algorithm.
    pub fn drainage() -> Self {
        use names::*;

        let destination = |name, label, kind| ParameterDefinition {
            name,
            label,
            kind,
            required: false,
        };

        Self {
            name: "drainagealg",
            label: "Compute drainage from DEM (alg)",
            group: "myscripts",
            group_label: "My scripts",
            description: "Employs SAGA terrain analysis tools to compute drainage for a DEM. \
                Returns: filled DEM, flow direction, catchment area, raster channel network, \
                and vector channel network.",
            parameters: vec![
                ParameterDefinition {
                    name: INPUT,
                    label: "Input DEM",
                    kind: ParameterKind::RasterLayer,
                    required: true,
                },
                ParameterDefinition {
                    name: MINSLOPE,
                    label: "Min. slope (degrees) for filled DEM",
                    kind: ParameterKind::Number {
                        default: DEFAULT_MIN_SLOPE,
                        min: Some(0.0),
                    },
                    required: false,
                },
                ParameterDefinition {
                    name: CATCHMENTMETHOD,
                    label: "Catchment area method",
                    kind: ParameterKind::Enum {
                        options: &CatchmentMethod::OPTION_LABELS,
                        default: CatchmentMethod::default().index(),
                    },
                    required: false,
                },
                ParameterDefinition {
                    name: THRESHOLD,
                    label: "Channel initiation threshold",
                    kind: ParameterKind::Number {
                        default: DEFAULT_THRESHOLD,
                        min: Some(0.0),
                    },
                    required: false,
                },
                destination(FILLED, "Filled DEM", ParameterKind::RasterDestination),
                destination(FLOWDIR, "Flow direction", ParameterKind::RasterDestination),
                destination(CATCHMENT, "Catchment area", ParameterKind::RasterDestination),
                destination(
                    CHANNELSRAST,
                    "Channel network (raster)",
                    ParameterKind::RasterDestination,
                ),
                destination(
                    CHANNELSVECT,
                    "Channel network (vector)",
                    ParameterKind::VectorDestination,
                ),
            ],
        }
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Outputs, one per destination parameter, in declaration order.
    pub fn outputs(&self) -> Vec<OutputDefinition> {
        self.parameters
            .iter()
            .filter_map(|p| {
                p.kind.layer_kind().map(|kind| OutputDefinition {
                    name: p.name,
                    label: p.label,
                    kind,
                })
            })
            .collect()
    }
}
