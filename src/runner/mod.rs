//! Pipeline execution.
//!
//! [`DrainagePipeline`] sequences the delegated tools and reports
//! [`StageProgress`] as it goes.

pub mod pipeline;
pub mod stage;

pub use pipeline::{
    catchment_area_call, channel_network_call, fill_sinks_call, DrainageOutputs,
    DrainagePipeline, PipelineOutcome,
};
pub use stage::{Stage, StageProgress};
