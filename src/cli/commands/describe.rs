//! Describe command implementation.
//!
//! The `drainage describe` command prints the algorithm's identity,
//! parameters and outputs.

use crate::algorithm::{AlgorithmDescriptor, ParameterKind};
use crate::cli::args::DescribeArgs;
use crate::error::{DrainageError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The describe command implementation.
pub struct DescribeCommand {
    args: DescribeArgs,
}

impl DescribeCommand {
    /// Create a new describe command.
    pub fn new(args: DescribeArgs) -> Self {
        Self { args }
    }
}

impl Command for DescribeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let descriptor = AlgorithmDescriptor::drainage();

        if self.args.json {
            let json = serde_json::to_string_pretty(&descriptor)
                .map_err(|e| DrainageError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        ui.show_header(descriptor.label);
        ui.show_value("name", descriptor.name);
        ui.show_value(
            "group",
            &format!("{} ({})", descriptor.group_label, descriptor.group),
        );
        ui.message("");
        ui.message(descriptor.description);
        ui.message("");

        ui.message("Parameters:");
        for param in &descriptor.parameters {
            ui.show_value(param.name, &format!("{} [{}]", param.label, describe_kind(param)));
        }

        ui.message("");
        ui.message("Outputs:");
        for output in descriptor.outputs() {
            ui.show_value(output.name, &format!("{} ({})", output.label, output.kind));
        }

        Ok(CommandResult::success())
    }
}

fn describe_kind(param: &crate::algorithm::ParameterDefinition) -> String {
    match &param.kind {
        ParameterKind::RasterLayer if param.required => "raster layer, required".to_string(),
        ParameterKind::RasterLayer => "raster layer".to_string(),
        ParameterKind::Number { default, min } => match min {
            Some(min) => format!("number >= {}, default {}", min, default),
            None => format!("number, default {}", default),
        },
        ParameterKind::Enum { options, default } => format!(
            "one of {} options, default {}",
            options.len(),
            options.get(*default).copied().unwrap_or("none")
        ),
        ParameterKind::RasterDestination => "raster destination, default temporary".to_string(),
        ParameterKind::VectorDestination => "vector destination, default temporary".to_string(),
    }
}
