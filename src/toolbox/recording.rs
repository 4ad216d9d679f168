//! In-process toolbox for tests.
//!
//! `RecordingToolbox` implements [`Toolbox`] without spawning anything. It
//! records every call, writes an empty placeholder file for each output, and
//! can be scripted to fail or to cancel when a given tool runs.
//!
//! # Example
//!
//! ```
//! use drainage::context::ProcessingContext;
//! use drainage::feedback::RecordingFeedback;
//! use drainage::toolbox::{RecordingToolbox, ToolCall, Toolbox, CATCHMENT_AREA};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut ctx = ProcessingContext::new(dir.path());
//! let toolbox = RecordingToolbox::new();
//!
//! toolbox
//!     .run(&ToolCall::new(CATCHMENT_AREA), &mut ctx, &RecordingFeedback::new())
//!     .unwrap();
//! assert_eq!(toolbox.algorithms(), vec![CATCHMENT_AREA]);
//! ```

use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;

use crate::context::ProcessingContext;
use crate::error::{DrainageError, Result};
use crate::feedback::{CancellationToken, Feedback};

use super::registry::lookup;
use super::{resolve_outputs, ToolCall, ToolOutputs, Toolbox};

/// What to do when a scripted tool runs.
#[derive(Debug, Clone)]
enum Script {
    Fail(String),
    Cancel(CancellationToken),
}

/// Toolbox double that records calls.
#[derive(Debug, Default)]
pub struct RecordingToolbox {
    calls: Mutex<Vec<ToolCall>>,
    scripts: HashMap<String, Script>,
}

impl RecordingToolbox {
    /// Create a toolbox where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make calls to `algorithm` fail with `message`.
    pub fn fail_on(mut self, algorithm: &str, message: &str) -> Self {
        self.scripts
            .insert(algorithm.to_string(), Script::Fail(message.to_string()));
        self
    }

    /// Cancel `token` when `algorithm` runs, after it has produced its outputs.
    pub fn cancel_on(mut self, algorithm: &str, token: CancellationToken) -> Self {
        self.scripts
            .insert(algorithm.to_string(), Script::Cancel(token));
        self
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Algorithm ids in call order.
    pub fn algorithms(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.algorithm)
            .collect()
    }
}

impl Toolbox for RecordingToolbox {
    fn run(
        &self,
        call: &ToolCall,
        ctx: &mut ProcessingContext,
        feedback: &dyn Feedback,
    ) -> Result<ToolOutputs> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.clone());
        }

        let spec = lookup(&call.algorithm).ok_or_else(|| DrainageError::UnknownTool {
            id: call.algorithm.clone(),
        })?;

        if let Some(Script::Fail(message)) = self.scripts.get(&call.algorithm) {
            return Err(DrainageError::ToolFailed {
                tool: spec.id.to_string(),
                code: Some(1),
                message: message.clone(),
            });
        }

        let outputs = resolve_outputs(spec, call, ctx)?;
        for (_, path) in outputs.iter() {
            fs::write(path, b"")?;
        }
        feedback.set_progress(100.0);

        if let Some(Script::Cancel(token)) = self.scripts.get(&call.algorithm) {
            token.cancel();
        }

        Ok(outputs)
    }
}
