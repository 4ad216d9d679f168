//! Config command implementation.
//!
//! The `drainage config` command shows the resolved configuration, or the
//! JSON Schema of the config file.

use crate::cli::args::ConfigArgs;
use crate::config::{load_resolved, ConfigPaths, DrainageConfig};
use crate::error::{DrainageError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    paths: ConfigPaths,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(paths: ConfigPaths, args: ConfigArgs) -> Self {
        Self { paths, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let schema = schemars::schema_for!(DrainageConfig);
            let json =
                serde_json::to_string_pretty(&schema).map_err(|e| DrainageError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let config = load_resolved(&self.paths)?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| DrainageError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        // Show config file path(s)
        let sources = self.paths.all();
        if sources.is_empty() {
            ui.message("# no config files found, showing defaults");
        } else {
            for path in &sources {
                ui.message(&format!("# {}", path.display()));
            }
        }
        ui.message("");

        let yaml = serde_yaml::to_string(&config).map_err(|e| DrainageError::Other(e.into()))?;
        ui.message(&yaml);

        Ok(CommandResult::success())
    }
}
