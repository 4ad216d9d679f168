//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::ConfigPaths;
use crate::error::Result;
use crate::ui::UserInterface;

/// Exit code for a run stopped by the user (128 + SIGINT).
pub const EXIT_CANCELED: i32 = 130;

/// Exit code for invalid usage or parameters.
pub const EXIT_USAGE: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config: None,
        }
    }

    /// Merge `config` over the discovered config files.
    pub fn with_config(mut self, config: Option<PathBuf>) -> Self {
        self.config = config;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Config files for this invocation.
    pub fn config_paths(&self) -> ConfigPaths {
        ConfigPaths::discover(&self.project_root).with_explicit(self.config.as_deref())
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Run(args) => {
                let cmd = super::run::RunCommand::new(
                    &self.project_root,
                    self.config_paths(),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::Describe(args) => {
                let cmd = super::describe::DescribeCommand::new(args.clone());
                cmd.execute(ui)
            }
            Commands::Methods(args) => {
                let cmd = super::methods::MethodsCommand::new(args.clone());
                cmd.execute(ui)
            }
            Commands::Config(args) => {
                let cmd = super::config::ConfigCommand::new(self.config_paths(), args.clone());
                cmd.execute(ui)
            }
            Commands::Check => {
                let cmd = super::check::CheckCommand::new(self.config_paths());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(EXIT_CANCELED);
        assert!(!result.success);
        assert_eq!(result.exit_code, 130);
    }

    #[test]
    fn explicit_config_is_last_layer() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/project"))
            .with_config(Some(PathBuf::from("/etc/drainage.yml")));
        let paths = dispatcher.config_paths();
        assert_eq!(
            paths.all().last().map(|p| p.as_path()),
            Some(Path::new("/etc/drainage.yml"))
        );
    }

    #[test]
    fn dispatches_methods() {
        let cli = Cli::parse_from(["drainage", "methods"]);
        let dispatcher = CommandDispatcher::new(PathBuf::from("."));
        let mut ui = MockUI::new();

        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();
        assert!(result.success);
        assert!(ui.has_output("Deterministic 8"));
    }
}
