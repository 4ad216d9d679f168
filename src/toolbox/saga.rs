//! Toolbox backed by the SAGA GIS command-line runner (`saga_cmd`).

use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use crate::algorithm::LayerKind;
use crate::config::ToolboxConfig;
use crate::context::ProcessingContext;
use crate::error::{DrainageError, Result};
use crate::feedback::Feedback;
use crate::process::{
    execute, execute_streaming, find_executable, parse_system_path, CommandOptions,
    CommandResult, OutputLine,
};

use super::registry::{lookup, ToolSpec};
use super::{resolve_outputs, ToolArg, ToolCall, ToolOutputs, Toolbox};

/// Progress lines, e.g. `45%` or `[ 45%]`.
static PROGRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[?\s*(\d{1,3})\s*%\s*\]?\s*$").expect("PROGRESS_REGEX must compile")
});

/// Version number in `saga_cmd --version` output.
static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+\.\d+)").expect("VERSION_REGEX must compile"));

/// Number of trailing error lines kept in a failure message.
const ERROR_TAIL_LINES: usize = 5;

/// What `saga_cmd --version` told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxInfo {
    /// Resolved executable path (None if it was only found by spawning).
    pub executable: Option<PathBuf>,
    /// Reported version, e.g. `7.3.0`.
    pub version: Option<String>,
}

/// Runs tool calls through `saga_cmd`.
#[derive(Debug, Clone)]
pub struct SagaToolbox {
    executable: String,
    options: CommandOptions,
    dry_run: bool,
}

impl SagaToolbox {
    /// Toolbox using `executable` with default options.
    pub fn new(executable: &str) -> Self {
        Self {
            executable: executable.to_string(),
            options: CommandOptions::default(),
            dry_run: false,
        }
    }

    /// Toolbox configured from the `toolbox` config section.
    pub fn from_config(config: &ToolboxConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            options: CommandOptions {
                cwd: None,
                env: config.env.clone(),
                timeout: config.timeout_secs.map(Duration::from_secs),
            },
            dry_run: false,
        }
    }

    /// Log command lines instead of executing them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Executable name or path.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Build the argument vector for a tool: library, tool index, then
    /// `-NAME value` pairs.
    pub fn command_args(spec: &ToolSpec, args: &[(String, OsString)]) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(2 + args.len() * 2);
        argv.push(OsString::from(spec.library));
        argv.push(OsString::from(spec.tool.to_string()));
        for (name, value) in args {
            argv.push(OsString::from(format!("-{}", name)));
            argv.push(value.clone());
        }
        argv
    }

    /// Check the executable and ask it for its version.
    pub fn probe(&self) -> Result<ToolboxInfo> {
        let executable = find_executable(&self.executable, &parse_system_path());
        let result = execute(&self.executable, &[OsString::from("--version")], &self.options)?;

        let text = format!("{}\n{}", result.stdout, result.stderr);
        let version = VERSION_REGEX
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        if version.is_none() && !result.success {
            return Err(DrainageError::ToolFailed {
                tool: self.executable.clone(),
                code: result.exit_code,
                message: error_tail(&result),
            });
        }

        Ok(ToolboxInfo {
            executable,
            version,
        })
    }

    fn render(&self, argv: &[OsString]) -> String {
        let mut line = self.executable.clone();
        for arg in argv {
            let arg = arg.to_string_lossy();
            line.push(' ');
            if arg.contains(char::is_whitespace) {
                line.push_str(&format!("\"{}\"", arg));
            } else {
                line.push_str(&arg);
            }
        }
        line
    }
}

impl Toolbox for SagaToolbox {
    fn run(
        &self,
        call: &ToolCall,
        ctx: &mut ProcessingContext,
        feedback: &dyn Feedback,
    ) -> Result<ToolOutputs> {
        let spec = lookup(&call.algorithm).ok_or_else(|| DrainageError::UnknownTool {
            id: call.algorithm.clone(),
        })?;

        let outputs = resolve_outputs(spec, call, ctx)?;

        let mut args: Vec<(String, OsString)> = Vec::with_capacity(call.args.len());
        for (name, arg) in &call.args {
            let value = match arg {
                ToolArg::Layer(path) => path.as_os_str().to_os_string(),
                ToolArg::Number(n) => OsString::from(n.to_string()),
                ToolArg::Integer(i) => OsString::from(i.to_string()),
                ToolArg::Output(_) => match outputs.get(name) {
                    Some(path) => path.as_os_str().to_os_string(),
                    None => continue,
                },
                ToolArg::Absent => continue,
            };
            args.push((name.clone(), value));
        }

        let argv = Self::command_args(spec, &args);
        let rendered = self.render(&argv);

        if self.dry_run {
            feedback.push_info(&rendered);
            return Ok(outputs);
        }

        tracing::debug!("running {}", rendered);

        let mut options = self.options.clone();
        options.cwd = Some(ctx.working_dir().to_path_buf());

        let result = execute_streaming(
            &self.executable,
            &argv,
            &options,
            &mut |line| report_line(feedback, line),
            &|| feedback.is_canceled(),
        )?;

        if result.canceled {
            return Err(DrainageError::Canceled);
        }
        if result.timed_out {
            return Err(DrainageError::ToolTimedOut {
                tool: spec.id.to_string(),
                seconds: options.timeout.map(|t| t.as_secs()).unwrap_or_default(),
            });
        }
        if !result.success {
            return Err(DrainageError::ToolFailed {
                tool: spec.id.to_string(),
                code: result.exit_code,
                message: error_tail(&result),
            });
        }

        for (name, path) in outputs.iter() {
            let kind = spec.output_kind(name).unwrap_or(LayerKind::Raster);
            if !output_exists(path, kind) {
                return Err(DrainageError::MissingOutput {
                    tool: spec.id.to_string(),
                    output: name.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }

        tracing::debug!(
            "{} finished in {:.1}s",
            spec.id,
            result.duration.as_secs_f64()
        );
        Ok(outputs)
    }
}

/// Route one line of tool output to feedback.
///
/// `saga_cmd` redraws its percentage with carriage returns, so a single line
/// may hold several updates.
fn report_line(feedback: &dyn Feedback, line: OutputLine) {
    let text = match line {
        OutputLine::Stdout(s) | OutputLine::Stderr(s) => s,
    };

    for segment in text.split('\r') {
        if let Some(percent) = parse_progress(segment) {
            feedback.set_progress(percent);
        } else if !segment.trim().is_empty() {
            feedback.push_info(segment.trim_end());
        }
    }
}

/// Parse a progress segment into a percentage.
pub(crate) fn parse_progress(segment: &str) -> Option<f64> {
    let caps = PROGRESS_REGEX.captures(segment)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    (value <= 100.0).then_some(value)
}

/// A raster counts as written when either the data file or its `.sgrd` header exists.
fn output_exists(path: &Path, kind: LayerKind) -> bool {
    match kind {
        LayerKind::Raster => path.exists() || path.with_extension("sgrd").exists(),
        LayerKind::Vector => path.exists(),
    }
}

fn error_tail(result: &CommandResult) -> String {
    let source = if result.stderr.trim().is_empty() {
        &result.stdout
    } else {
        &result.stderr
    };
    let lines: Vec<&str> = source
        .lines()
        .flat_map(|l| l.split('\r'))
        .map(str::trim)
        .filter(|l| !l.is_empty() && parse_progress(l).is_none())
        .collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    let tail = lines[start..].join("; ");
    if tail.is_empty() {
        "no error output".to_string()
    } else {
        tail
    }
}
