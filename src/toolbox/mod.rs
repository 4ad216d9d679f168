//! Delegated terrain-analysis tools.
//!
//! The pipeline describes each step as a [`ToolCall`] and hands it to a
//! [`Toolbox`]. The production toolbox is [`SagaToolbox`], which runs the
//! SAGA GIS command-line runner. [`RecordingToolbox`] stands in for it in
//! tests.
//!
//! # Example
//!
//! ```
//! use drainage::algorithm::Destination;
//! use drainage::toolbox::{ToolArg, ToolCall, FILL_SINKS};
//!
//! let call = ToolCall::new(FILL_SINKS)
//!     .arg("ELEV", ToolArg::Layer("dem.sdat".into()))
//!     .arg("MINSLOPE", ToolArg::Number(0.01))
//!     .arg("FILLED", ToolArg::Output(Destination::Temporary));
//!
//! assert_eq!(call.args.len(), 3);
//! assert!(matches!(call.get("MINSLOPE"), Some(ToolArg::Number(_))));
//! ```

pub mod recording;
pub mod registry;
pub mod saga;

pub use recording::RecordingToolbox;
pub use registry::{lookup, ToolSpec, CATCHMENT_AREA, CHANNEL_NETWORK, FILL_SINKS, TOOLS};
pub use saga::{SagaToolbox, ToolboxInfo};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::algorithm::Destination;
use crate::context::ProcessingContext;
use crate::error::{DrainageError, Result};
use crate::feedback::Feedback;

/// Value of one tool argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolArg {
    /// An existing layer on disk.
    Layer(PathBuf),
    /// A floating point value.
    Number(f64),
    /// An integer or option index.
    Integer(i64),
    /// Where the tool should write an output.
    Output(Destination),
    /// An optional argument left unset.
    Absent,
}

/// One invocation of a delegated tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Algorithm id, e.g. `saga:fillsinkswangliu`.
    pub algorithm: String,
    /// Arguments in the order they are passed.
    pub args: Vec<(String, ToolArg)>,
}

impl ToolCall {
    /// Start a call to `algorithm` with no arguments.
    pub fn new(algorithm: &str) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, name: &str, value: ToolArg) -> Self {
        self.args.push((name.to_string(), value));
        self
    }

    /// Look up an argument by name.
    pub fn get(&self, name: &str) -> Option<&ToolArg> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Concrete output paths produced by a tool, keyed by output name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutputs {
    tool: String,
    paths: BTreeMap<String, PathBuf>,
}

impl ToolOutputs {
    /// Empty outputs for `tool`.
    pub fn new(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
            paths: BTreeMap::new(),
        }
    }

    /// Record an output path.
    pub fn insert(&mut self, name: &str, path: PathBuf) {
        self.paths.insert(name.to_string(), path);
    }

    /// Path of an output, if the tool produced it.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }

    /// Path of an output the caller cannot do without.
    pub fn require(&self, name: &str) -> Result<PathBuf> {
        self.paths
            .get(name)
            .cloned()
            .ok_or_else(|| DrainageError::MissingOutput {
                tool: self.tool.clone(),
                output: name.to_string(),
                path: PathBuf::new(),
            })
    }

    /// All outputs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.paths.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Number of outputs.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether there are no outputs.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Something that can execute delegated tool calls.
pub trait Toolbox {
    /// Execute `call`, writing outputs where `ctx` says, and return their paths.
    ///
    /// Implementations return [`DrainageError::Canceled`] when they abort
    /// because `feedback` reported cancellation.
    fn run(
        &self,
        call: &ToolCall,
        ctx: &mut ProcessingContext,
        feedback: &dyn Feedback,
    ) -> Result<ToolOutputs>;
}

/// Resolve every output argument of `call` through `ctx`.
///
/// Output kinds come from the registry entry for the call's algorithm.
pub(crate) fn resolve_outputs(
    spec: &ToolSpec,
    call: &ToolCall,
    ctx: &mut ProcessingContext,
) -> Result<ToolOutputs> {
    let mut outputs = ToolOutputs::new(spec.id);
    for (name, arg) in &call.args {
        if let ToolArg::Output(dest) = arg {
            let kind = spec
                .output_kind(name)
                .ok_or_else(|| DrainageError::invalid_parameter(name, "not an output of this tool"))?;
            let path = ctx.resolve_destination(dest, name, kind)?;
            outputs.insert(name, path);
        }
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_builder_keeps_order() {
        let call = ToolCall::new(CATCHMENT_AREA)
            .arg("ELEVATION", ToolArg::Layer("filled.sdat".into()))
            .arg("METHOD", ToolArg::Integer(4))
            .arg("FLOW", ToolArg::Output(Destination::Temporary));
        let names: Vec<_> = call.args.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["ELEVATION", "METHOD", "FLOW"]);
        assert_eq!(call.get("METHOD"), Some(&ToolArg::Integer(4)));
        assert_eq!(call.get("NOPE"), None);
    }

    #[test]
    fn require_reports_missing_output() {
        let outputs = ToolOutputs::new(FILL_SINKS);
        let err = outputs.require("FDIR").unwrap_err();
        assert!(err.to_string().contains("FDIR"));
        assert!(err.to_string().contains(FILL_SINKS));
    }

    #[test]
    fn resolve_outputs_uses_registry_kinds() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut ctx = ProcessingContext::new(temp.path());
        let call = ToolCall::new(CHANNEL_NETWORK)
            .arg("ELEVATION", ToolArg::Layer("filled.sdat".into()))
            .arg("SHAPES", ToolArg::Output(Destination::Path("net".into())));
        let spec = lookup(CHANNEL_NETWORK).unwrap();

        let outputs = resolve_outputs(spec, &call, &mut ctx).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs.get("SHAPES"), Some(temp.path().join("net.shp").as_path()));
    }

    #[test]
    fn resolve_outputs_rejects_undeclared_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut ctx = ProcessingContext::new(temp.path());
        let call = ToolCall::new(FILL_SINKS).arg("BOGUS", ToolArg::Output(Destination::Temporary));
        let spec = lookup(FILL_SINKS).unwrap();

        assert!(resolve_outputs(spec, &call, &mut ctx).is_err());
    }
}
