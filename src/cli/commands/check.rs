//! Check command implementation.
//!
//! The `drainage check` command verifies that the configured SAGA runner
//! can be started and reports its version.

use crate::config::{load_resolved, ConfigPaths};
use crate::error::{DrainageError, Result};
use crate::toolbox::{SagaToolbox, TOOLS};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    paths: ConfigPaths,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(paths: ConfigPaths) -> Self {
        Self { paths }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_resolved(&self.paths)?;
        let toolbox = SagaToolbox::from_config(&config.toolbox);

        let mut spinner = ui.start_spinner(&format!("Probing {}", toolbox.executable()));
        let info = match toolbox.probe() {
            Ok(info) => info,
            Err(e @ DrainageError::ToolNotFound { .. }) => {
                spinner.finish_error(&e.to_string());
                ui.message("Set toolbox.executable in .drainage/config.yml or DRAINAGE_SAGA_CMD.");
                return Ok(CommandResult::failure(1));
            }
            Err(e) => {
                spinner.finish_error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        let version = info.version.as_deref().unwrap_or("unknown version");
        spinner.finish_success(&format!("{} ({})", toolbox.executable(), version));

        if let Some(path) = &info.executable {
            ui.show_value("path", &path.display().to_string());
        }
        for tool in TOOLS {
            ui.show_value(tool.id, &format!("{} {}", tool.library, tool.tool));
        }

        Ok(CommandResult::success())
    }
}
