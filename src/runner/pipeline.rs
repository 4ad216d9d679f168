//! The three-stage drainage pipeline.
//!
//! Fill sinks feeds the filled DEM and flow direction into catchment area,
//! and all three feed channel network. Cancellation is checked after every
//! stage; a cancelled run yields no results.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::algorithm::{names, Destination, DrainageParameters, ParameterMap, ParameterValue};
use crate::config::ChannelsConfig;
use crate::context::ProcessingContext;
use crate::error::{DrainageError, Result};
use crate::feedback::Feedback;
use crate::toolbox::{ToolArg, ToolCall, ToolOutputs, Toolbox};

use super::stage::{Stage, StageProgress};

/// Final layers of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrainageOutputs {
    pub filled: PathBuf,
    pub flow_dir: PathBuf,
    pub catchment: PathBuf,
    pub channels_raster: PathBuf,
    pub channels_vector: PathBuf,
}

impl DrainageOutputs {
    /// Outputs with their parameter names, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        [
            (names::FILLED, &self.filled),
            (names::FLOWDIR, &self.flow_dir),
            (names::CATCHMENT, &self.catchment),
            (names::CHANNELSRAST, &self.channels_raster),
            (names::CHANNELSVECT, &self.channels_vector),
        ]
        .into_iter()
        .map(|(name, path)| (name, path.as_path()))
    }

    /// Outputs keyed by their parameter names.
    pub fn to_map(&self) -> ParameterMap {
        self.iter()
            .map(|(name, path)| (name.to_string(), ParameterValue::from(path.to_path_buf())))
            .collect()
    }
}

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Every stage ran.
    Completed(DrainageOutputs),
    /// Cancellation was observed; `completed` lists the stages that finished.
    Canceled { completed: Vec<Stage> },
}

impl PipelineOutcome {
    /// Whether the run was cancelled.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }

    /// Named results, empty when cancelled.
    pub fn into_results(self) -> ParameterMap {
        match self {
            Self::Completed(outputs) => outputs.to_map(),
            Self::Canceled { .. } => ParameterMap::new(),
        }
    }
}

/// Runs the drainage stages against a toolbox.
pub struct DrainagePipeline<'a> {
    toolbox: &'a dyn Toolbox,
    channels: ChannelsConfig,
}

impl<'a> DrainagePipeline<'a> {
    /// Create a pipeline.
    pub fn new(toolbox: &'a dyn Toolbox, channels: ChannelsConfig) -> Self {
        Self { toolbox, channels }
    }

    /// Run every stage.
    pub fn run(
        &self,
        params: &DrainageParameters,
        ctx: &mut ProcessingContext,
        feedback: &dyn Feedback,
    ) -> Result<PipelineOutcome> {
        self.run_with_progress(params, ctx, feedback, |_| {})
    }

    /// Run every stage, reporting stage transitions to `on_progress`.
    pub fn run_with_progress(
        &self,
        params: &DrainageParameters,
        ctx: &mut ProcessingContext,
        feedback: &dyn Feedback,
        mut on_progress: impl FnMut(StageProgress),
    ) -> Result<PipelineOutcome> {
        let input = ctx.resolve_input(&params.input);
        if !input.exists() {
            return Err(DrainageError::MissingInput { path: input });
        }

        let total = Stage::ALL.len();
        let mut completed = Vec::with_capacity(total);

        let fill_call = fill_sinks_call(params, input);
        let filled = match self.run_stage(
            Stage::FillSinks,
            &fill_call,
            ctx,
            feedback,
            total,
            &mut on_progress,
        )? {
            Some(outputs) => outputs,
            None => return Ok(PipelineOutcome::Canceled { completed }),
        };
        if let Some(outcome) = self.checkpoint(Stage::FillSinks, feedback, &mut completed) {
            return Ok(outcome);
        }
        let filled_dem = filled.require("FILLED")?;
        let flow_dir = filled.require("FDIR")?;

        let catchment_call = catchment_area_call(params, filled_dem.clone());
        let catchment = match self.run_stage(
            Stage::CatchmentArea,
            &catchment_call,
            ctx,
            feedback,
            total,
            &mut on_progress,
        )? {
            Some(outputs) => outputs,
            None => return Ok(PipelineOutcome::Canceled { completed }),
        };
        if let Some(outcome) = self.checkpoint(Stage::CatchmentArea, feedback, &mut completed) {
            return Ok(outcome);
        }
        let flow = catchment.require("FLOW")?;

        let channel_call = channel_network_call(
            params,
            &self.channels,
            filled_dem.clone(),
            flow_dir.clone(),
            flow.clone(),
        );
        let channels = match self.run_stage(
            Stage::ChannelNetwork,
            &channel_call,
            ctx,
            feedback,
            total,
            &mut on_progress,
        )? {
            Some(outputs) => outputs,
            None => return Ok(PipelineOutcome::Canceled { completed }),
        };
        if let Some(outcome) = self.checkpoint(Stage::ChannelNetwork, feedback, &mut completed) {
            return Ok(outcome);
        }

        Ok(PipelineOutcome::Completed(DrainageOutputs {
            filled: filled_dem,
            flow_dir,
            catchment: flow,
            channels_raster: channels.require("CHNLNTWRK")?,
            channels_vector: channels.require("SHAPES")?,
        }))
    }

    /// Run one stage. `Ok(None)` means the toolbox aborted on cancellation.
    fn run_stage(
        &self,
        stage: Stage,
        call: &ToolCall,
        ctx: &mut ProcessingContext,
        feedback: &dyn Feedback,
        total: usize,
        on_progress: &mut impl FnMut(StageProgress),
    ) -> Result<Option<ToolOutputs>> {
        on_progress(StageProgress::StageStarting {
            stage,
            index: stage.index(),
            total,
        });
        info!("starting stage: {}", stage);

        let start = Instant::now();
        match self.toolbox.run(call, ctx, feedback) {
            Ok(outputs) => {
                let duration = start.elapsed();
                info!("finished stage: {} in {:?}", stage, duration);
                on_progress(StageProgress::StageFinished { stage, duration });
                Ok(Some(outputs))
            }
            Err(DrainageError::Canceled) => {
                info!("stage {} cancelled", stage);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Check for cancellation after `stage`, otherwise report its completion.
    fn checkpoint(
        &self,
        stage: Stage,
        feedback: &dyn Feedback,
        completed: &mut Vec<Stage>,
    ) -> Option<PipelineOutcome> {
        if feedback.is_canceled() {
            info!("cancelled after stage: {}", stage);
            return Some(PipelineOutcome::Canceled {
                completed: std::mem::take(completed),
            });
        }
        feedback.set_progress_text(stage.completion_text());
        completed.push(stage);
        None
    }
}

/// Call for the fill sinks stage.
///
/// Watershed basins go to a temporary destination.
pub fn fill_sinks_call(params: &DrainageParameters, input: PathBuf) -> ToolCall {
    ToolCall::new(Stage::FillSinks.tool_id())
        .arg("ELEV", ToolArg::Layer(input))
        .arg("MINSLOPE", ToolArg::Number(params.min_slope))
        .arg("FILLED", ToolArg::Output(params.filled.clone()))
        .arg("FDIR", ToolArg::Output(params.flow_dir.clone()))
        .arg("WSHED", ToolArg::Output(Destination::Temporary))
}

/// Call for the catchment area stage.
pub fn catchment_area_call(params: &DrainageParameters, filled: PathBuf) -> ToolCall {
    ToolCall::new(Stage::CatchmentArea.tool_id())
        .arg("ELEVATION", ToolArg::Layer(filled))
        .arg(
            "METHOD",
            ToolArg::Integer(params.catchment_method.index() as i64),
        )
        .arg("FLOW", ToolArg::Output(params.catchment.clone()))
}

/// Call for the channel network stage.
///
/// Channel direction goes to a temporary destination.
pub fn channel_network_call(
    params: &DrainageParameters,
    channels: &ChannelsConfig,
    filled: PathBuf,
    flow_dir: PathBuf,
    catchment: PathBuf,
) -> ToolCall {
    ToolCall::new(Stage::ChannelNetwork.tool_id())
        .arg("ELEVATION", ToolArg::Layer(filled))
        .arg("SINKROUTE", ToolArg::Layer(flow_dir))
        .arg("INIT_GRID", ToolArg::Layer(catchment))
        .arg("INIT_METHOD", ToolArg::Integer(channels.initiation.index()))
        .arg("INIT_VALUE", ToolArg::Number(params.threshold))
        .arg("DIV_GRID", ToolArg::Absent)
        .arg(
            "DIV_CELLS",
            ToolArg::Integer(i64::from(channels.max_divergence_cells)),
        )
        .arg("TRACE_WEIGHT", ToolArg::Absent)
        .arg(
            "MINLEN",
            ToolArg::Integer(i64::from(channels.min_segment_length)),
        )
        .arg(
            "CHNLNTWRK",
            ToolArg::Output(params.channels_raster.clone()),
        )
        .arg("CHNLROUTE", ToolArg::Output(Destination::Temporary))
        .arg("SHAPES", ToolArg::Output(params.channels_vector.clone()))
}
