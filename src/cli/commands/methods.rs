//! Methods command implementation.
//!
//! The `drainage methods` command lists the catchment area methods accepted
//! by `--catchment-method`.

use serde::Serialize;

use crate::algorithm::CatchmentMethod;
use crate::cli::args::MethodsArgs;
use crate::error::{DrainageError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The methods command implementation.
pub struct MethodsCommand {
    args: MethodsArgs,
}

#[derive(Serialize)]
struct MethodEntry {
    index: usize,
    alias: &'static str,
    name: &'static str,
    default: bool,
}

impl MethodsCommand {
    /// Create a new methods command.
    pub fn new(args: MethodsArgs) -> Self {
        Self { args }
    }
}

impl Command for MethodsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let entries: Vec<MethodEntry> = CatchmentMethod::ALL
            .iter()
            .map(|m| MethodEntry {
                index: m.index(),
                alias: m.alias(),
                name: m.name(),
                default: *m == CatchmentMethod::default(),
            })
            .collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| DrainageError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        for entry in &entries {
            let marker = if entry.default { " (default)" } else { "" };
            ui.message(&format!(
                "  [{}] {:<16} {}{}",
                entry.index, entry.alias, entry.name, marker
            ));
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn lists_six_methods() {
        let mut ui = MockUI::new();
        MethodsCommand::new(MethodsArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ui.messages().len(), 6);
        assert!(ui.messages()[0].contains("(default)"));
        assert!(ui.messages()[4].contains("mfd"));
    }

    #[test]
    fn json_lists_aliases() {
        let mut ui = MockUI::new();
        MethodsCommand::new(MethodsArgs { json: true })
            .execute(&mut ui)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value[3]["alias"], "dinf");
        assert_eq!(value[0]["default"], true);
    }
}
