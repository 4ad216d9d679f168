//! Pipeline stages and their progress events.

use std::fmt;
use std::time::Duration;

use crate::toolbox::{CATCHMENT_AREA, CHANNEL_NETWORK, FILL_SINKS};

/// One step of the drainage pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Remove spurious depressions and derive flow direction.
    FillSinks,
    /// Accumulate upstream contributing area.
    CatchmentArea,
    /// Trace channels where accumulated area exceeds the threshold.
    ChannelNetwork,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 3] = [Self::FillSinks, Self::CatchmentArea, Self::ChannelNetwork];

    /// Algorithm id of the delegated tool.
    pub fn tool_id(self) -> &'static str {
        match self {
            Self::FillSinks => FILL_SINKS,
            Self::CatchmentArea => CATCHMENT_AREA,
            Self::ChannelNetwork => CHANNEL_NETWORK,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::FillSinks => "Fill sinks",
            Self::CatchmentArea => "Catchment area",
            Self::ChannelNetwork => "Channel network",
        }
    }

    /// Progress text reported once the stage has finished.
    pub fn completion_text(self) -> &'static str {
        match self {
            Self::FillSinks => "DEM filled",
            Self::CatchmentArea => "Catchment area computed",
            Self::ChannelNetwork => "Channel network computed",
        }
    }

    /// Zero-based position in the pipeline.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Progress events emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum StageProgress {
    /// A stage is about to start.
    StageStarting {
        stage: Stage,
        index: usize,
        total: usize,
    },
    /// A stage finished successfully.
    StageFinished { stage: Stage, duration: Duration },
}
