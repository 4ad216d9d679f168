//! Run command implementation.
//!
//! The `drainage run` command validates parameters, runs the three SAGA
//! stages and reports where the outputs were written.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::algorithm::{
    names, AlgorithmDescriptor, DrainageParameters, ParameterMap, ParameterValue,
};
use crate::cli::args::RunArgs;
use crate::config::{load_resolved, ConfigPaths, DrainageConfig};
use crate::context::ProcessingContext;
use crate::error::{DrainageError, Result};
use crate::feedback::{CancellationToken, ConsoleFeedback};
use crate::runner::{DrainagePipeline, PipelineOutcome, Stage, StageProgress};
use crate::toolbox::SagaToolbox;
use crate::ui::{format_duration, OutputMode, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_CANCELED, EXIT_USAGE};

/// Summary of one run, printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub algorithm: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub dry_run: bool,
    pub parameters: ParameterMap,
    pub outputs: ParameterMap,
    pub completed_stages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Canceled,
    Failed,
}

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    paths: ConfigPaths,
    args: RunArgs,
    token: CancellationToken,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, paths: ConfigPaths, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            paths,
            args,
            token: CancellationToken::with_interrupts(),
        }
    }

    /// Use `token` for cancellation instead of SIGINT.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Assemble the host parameter map.
    ///
    /// Precedence, highest first: command-line flags, the `--params` file,
    /// then the `defaults` config section.
    pub fn parameter_map(&self, config: &DrainageConfig) -> Result<ParameterMap> {
        let mut map = match &self.args.params {
            Some(path) => load_parameter_file(path)?,
            None => ParameterMap::new(),
        };

        let args = &self.args;
        map.insert(names::INPUT.into(), args.input.clone().into());
        if let Some(v) = args.min_slope {
            map.insert(names::MINSLOPE.into(), v.into());
        }
        if let Some(v) = &args.catchment_method {
            map.insert(names::CATCHMENTMETHOD.into(), v.as_str().into());
        }
        if let Some(v) = args.threshold {
            map.insert(names::THRESHOLD.into(), v.into());
        }
        for (name, value) in [
            (names::FILLED, &args.filled),
            (names::FLOWDIR, &args.flow_dir),
            (names::CATCHMENT, &args.catchment),
            (names::CHANNELSRAST, &args.channels_raster),
            (names::CHANNELSVECT, &args.channels_vector),
        ] {
            if let Some(v) = value {
                map.insert(name.into(), v.as_str().into());
            }
        }

        let defaults = &config.defaults;
        if let Some(v) = defaults.min_slope {
            fill_default(&mut map, names::MINSLOPE, v.into());
        }
        if let Some(m) = defaults.catchment_method {
            fill_default(&mut map, names::CATCHMENTMETHOD, (m.index() as f64).into());
        }
        if let Some(v) = defaults.threshold {
            fill_default(&mut map, names::THRESHOLD, v.into());
        }

        Ok(map)
    }

    fn output_dir(&self, config: &DrainageConfig) -> Option<PathBuf> {
        self.args
            .output_dir
            .clone()
            .or_else(|| config.output.directory.clone())
            .map(|dir| {
                if dir.is_absolute() {
                    dir
                } else {
                    self.project_root.join(dir)
                }
            })
    }

    fn print_report(&self, report: &RunReport) -> Result<()> {
        let json =
            serde_json::to_string_pretty(report).map_err(|e| DrainageError::Other(e.into()))?;
        println!("{}", json);
        Ok(())
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_resolved(&self.paths)?;

        // Apply config output mode when no CLI flag was explicitly set
        if ui.output_mode() == OutputMode::Normal {
            if let Some(mode) = config.output.mode {
                ui.set_output_mode(mode.into());
            }
        }
        if self.args.json {
            ui.set_output_mode(OutputMode::Silent);
        }

        let descriptor = AlgorithmDescriptor::drainage();
        let started_at = Utc::now();
        let start = Instant::now();
        let mut report = RunReport {
            algorithm: descriptor.name.to_string(),
            status: RunStatus::Failed,
            started_at,
            duration_ms: 0,
            dry_run: self.args.dry_run,
            parameters: ParameterMap::new(),
            outputs: ParameterMap::new(),
            completed_stages: Vec::new(),
            temp_dir: None,
            error: None,
        };

        let validated = self.parameter_map(&config).and_then(|map| {
            let params = DrainageParameters::from_map(&map);
            report.parameters = map;
            params
        });
        let params = match validated {
            Ok(params) => params,
            // JSON consumers still get a report for a run that never started.
            Err(e) if self.args.json => {
                ui.error(&e.to_string());
                report.error = Some(e.to_string());
                report.duration_ms = start.elapsed().as_millis() as u64;
                self.print_report(&report)?;
                return Ok(CommandResult::failure(exit_code_for(&e)));
            }
            Err(e) => return Err(e),
        };
        tracing::debug!("parameters: {:?}", params);
        report.parameters = params.to_map();

        ui.show_header(descriptor.label);
        if self.args.dry_run {
            ui.message("Dry run: printing tool command lines, nothing is executed");
        }

        let toolbox = SagaToolbox::from_config(&config.toolbox).with_dry_run(self.args.dry_run);
        let mut ctx = ProcessingContext::new(&self.project_root)
            .with_output_dir(self.output_dir(&config))
            .with_keep_temporary(config.toolbox.keep_temporary || self.args.keep_temp);

        // Command lines are the point of a dry run, so show them like tool output.
        let feedback_mode = if self.args.dry_run && ui.output_mode().shows_status() {
            OutputMode::Verbose
        } else {
            ui.output_mode()
        };
        let feedback = ConsoleFeedback::new(feedback_mode, ui.is_interactive(), self.token.clone());

        let pipeline = DrainagePipeline::new(&toolbox, config.channels.clone());
        let outcome = pipeline.run_with_progress(&params, &mut ctx, &feedback, |event| match event {
            StageProgress::StageStarting {
                stage,
                index,
                total,
            } => {
                feedback.set_stage(&format!("[{}/{}] {}", index + 1, total, stage));
            }
            StageProgress::StageFinished { stage, duration } => {
                feedback.suspend(|| {
                    ui.success(&format!("{} ({})", stage, format_duration(duration)))
                });
            }
        });
        feedback.finish();

        let result = match outcome {
            Ok(PipelineOutcome::Completed(outputs)) => {
                let outputs_are_temporary = outputs.iter().any(|(_, p)| ctx.is_temporary_path(p));
                let temp_dir = ctx.finish(outputs_are_temporary && !self.args.dry_run);

                ui.success(&format!(
                    "Drainage computed in {}",
                    format_duration(start.elapsed())
                ));
                for (name, path) in outputs.iter() {
                    ui.show_value(name, &path.display().to_string());
                }
                if let Some(dir) = &temp_dir {
                    ui.message(&format!("Temporary outputs kept in {}", dir.display()));
                }

                report.status = RunStatus::Completed;
                report.completed_stages = Stage::ALL.iter().map(|s| s.to_string()).collect();
                report.temp_dir = temp_dir;
                report.outputs = outputs.to_map();
                CommandResult::success()
            }
            Ok(PipelineOutcome::Canceled { completed }) => {
                report.temp_dir = ctx.finish(false);
                ui.warning(&format!(
                    "Cancelled after {} of {} stages, no outputs returned",
                    completed.len(),
                    Stage::ALL.len()
                ));

                report.status = RunStatus::Canceled;
                report.completed_stages = completed.iter().map(|s| s.to_string()).collect();
                CommandResult::failure(EXIT_CANCELED)
            }
            Err(e) => {
                report.temp_dir = ctx.finish(false);
                ui.error(&e.to_string());

                report.error = Some(e.to_string());
                CommandResult::failure(exit_code_for(&e))
            }
        };

        report.duration_ms = start.elapsed().as_millis() as u64;
        if self.args.json {
            self.print_report(&report)?;
        }

        Ok(result)
    }
}

/// Read a JSON or YAML parameter map.
fn load_parameter_file(path: &Path) -> Result<ParameterMap> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DrainageError::MissingInput {
                path: path.to_path_buf(),
            }
        } else {
            DrainageError::Io(e)
        }
    })?;

    // JSON is a subset of YAML, so one parser covers both.
    serde_yaml::from_str(&content).map_err(|e| DrainageError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn exit_code_for(err: &DrainageError) -> i32 {
    if err.is_usage_error() {
        EXIT_USAGE
    } else {
        1
    }
}

/// Set `key` unless it already holds a value.
fn fill_default(map: &mut ParameterMap, key: &str, value: ParameterValue) {
    let slot = map.entry(key.to_string()).or_insert(ParameterValue::Null);
    if *slot == ParameterValue::Null {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::CatchmentMethod;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn project(config: Option<&str>) -> (TempDir, ConfigPaths) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dem.sdat"), b"").unwrap();
        if let Some(config) = config {
            let dir = temp.path().join(".drainage");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("config.yml"), config).unwrap();
        }
        let paths = ConfigPaths {
            user_global: None,
            ..ConfigPaths::discover(temp.path())
        };
        (temp, paths)
    }

    fn args(input: &str) -> RunArgs {
        RunArgs {
            input: PathBuf::from(input),
            ..Default::default()
        }
    }

    #[test]
    fn flags_override_params_file_and_config() {
        let (temp, paths) = project(Some("defaults:\n  threshold: 10\n  min_slope: 0.5\n"));
        let params_file = temp.path().join("params.json");
        fs::write(&params_file, r#"{"THRESHOLD": 20, "CATCHMENTMETHOD": "rho8"}"#).unwrap();
        let run_args = RunArgs {
            params: Some(params_file),
            threshold: Some(30.0),
            ..args("dem.sdat")
        };
        let cmd = RunCommand::new(temp.path(), paths.clone(), run_args);

        let config = load_resolved(&paths).unwrap();
        let params = DrainageParameters::from_map(&cmd.parameter_map(&config).unwrap()).unwrap();

        assert_eq!(params.threshold, 30.0);
        assert_eq!(params.min_slope, 0.5);
        assert_eq!(params.catchment_method, CatchmentMethod::Rho8);
    }

    #[test]
    fn config_method_fills_null_entries() {
        let (temp, paths) = project(Some("defaults:\n  catchment_method: mfd\n"));
        let params_file = temp.path().join("params.yml");
        fs::write(&params_file, "CATCHMENTMETHOD: null\n").unwrap();
        let run_args = RunArgs {
            params: Some(params_file),
            ..args("dem.sdat")
        };
        let cmd = RunCommand::new(temp.path(), paths.clone(), run_args);

        let config = load_resolved(&paths).unwrap();
        let params = DrainageParameters::from_map(&cmd.parameter_map(&config).unwrap()).unwrap();
        assert_eq!(
            params.catchment_method,
            CatchmentMethod::MultipleFlowDirection
        );
    }

    #[test]
    fn dry_run_succeeds_without_saga() {
        let (temp, paths) = project(Some("toolbox:\n  executable: not-installed-saga\n"));
        let run_args = RunArgs {
            dry_run: true,
            ..args("dem.sdat")
        };
        let mut ui = MockUI::new();

        let result = RunCommand::new(temp.path(), paths, run_args)
            .with_token(CancellationToken::new())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.successes().len(), 4);
        assert!(ui.successes()[0].starts_with("Fill sinks"));
        assert_eq!(ui.values().len(), 5);
    }

    #[test]
    fn missing_input_is_a_usage_failure() {
        let (temp, paths) = project(None);
        let mut ui = MockUI::new();

        let result = RunCommand::new(temp.path(), paths, args("nope.sdat"))
            .with_token(CancellationToken::new())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, EXIT_USAGE);
        assert!(ui.errors()[0].contains("nope.sdat"));
    }

    #[test]
    fn invalid_parameter_is_an_error() {
        let (temp, paths) = project(None);
        let run_args = RunArgs {
            threshold: Some(-5.0),
            ..args("dem.sdat")
        };
        let mut ui = MockUI::new();

        let err = RunCommand::new(temp.path(), paths, run_args)
            .execute(&mut ui)
            .unwrap_err();
        assert!(matches!(err, DrainageError::InvalidParameter { .. }));
    }

    #[test]
    fn invalid_parameter_with_json_is_a_failed_run() {
        let (temp, paths) = project(None);
        let run_args = RunArgs {
            threshold: Some(-5.0),
            json: true,
            ..args("dem.sdat")
        };
        let mut ui = MockUI::new();

        let result = RunCommand::new(temp.path(), paths, run_args)
            .with_token(CancellationToken::new())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, EXIT_USAGE);
    }

    #[test]
    fn cancelled_before_start_returns_no_outputs() {
        let (temp, paths) = project(None);
        let token = CancellationToken::new();
        token.cancel();
        let run_args = RunArgs {
            dry_run: true,
            ..args("dem.sdat")
        };
        let mut ui = MockUI::new();

        let result = RunCommand::new(temp.path(), paths, run_args)
            .with_token(token)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, EXIT_CANCELED);
        assert!(ui.values().is_empty());
        assert!(ui.warnings()[0].contains("0 of 3"));
    }

    #[test]
    fn tool_failure_exits_with_one() {
        let (temp, paths) = project(Some("toolbox:\n  executable: not-installed-saga-xyz\n"));
        let mut ui = MockUI::new();

        let result = RunCommand::new(temp.path(), paths, args("dem.sdat"))
            .with_token(CancellationToken::new())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_output("not-installed-saga-xyz"));
    }

    #[test]
    fn fill_default_keeps_existing_values() {
        let mut map = ParameterMap::new();
        map.insert("THRESHOLD".into(), 5.0.into());
        fill_default(&mut map, "THRESHOLD", 9.0.into());
        fill_default(&mut map, "MINSLOPE", 0.2.into());
        assert_eq!(map["THRESHOLD"], ParameterValue::Number(5.0));
        assert_eq!(map["MINSLOPE"], ParameterValue::Number(0.2));
    }
}
