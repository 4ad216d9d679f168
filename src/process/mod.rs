//! External process execution and platform helpers.

pub mod command;
pub mod platform;

pub use command::{execute, execute_streaming, CommandOptions, CommandResult, OutputLine};
pub use platform::{find_executable, is_ci, parse_system_path};
