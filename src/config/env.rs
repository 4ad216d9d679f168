//! Environment variable overrides.

use std::path::PathBuf;

use super::schema::DrainageConfig;

/// Overrides `toolbox.executable`.
pub const SAGA_CMD_VAR: &str = "DRAINAGE_SAGA_CMD";

/// Overrides `output.directory`.
pub const OUTPUT_DIR_VAR: &str = "DRAINAGE_OUTPUT_DIR";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut DrainageConfig) {
    apply_env_overrides_with(config, |key| std::env::var(key).ok());
}

/// Apply overrides using a custom lookup.
///
/// This allows testing without modifying actual environment variables.
pub fn apply_env_overrides_with<F>(config: &mut DrainageConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(exe) = lookup(SAGA_CMD_VAR).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("{} overrides toolbox executable", SAGA_CMD_VAR);
        config.toolbox.executable = exe;
    }
    if let Some(dir) = lookup(OUTPUT_DIR_VAR).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("{} overrides output directory", OUTPUT_DIR_VAR);
        config.output.directory = Some(PathBuf::from(dir));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn overrides_executable_and_output_dir() {
        let vars: HashMap<&str, &str> = [
            (SAGA_CMD_VAR, "/usr/local/bin/saga_cmd"),
            (OUTPUT_DIR_VAR, "/data/out"),
        ]
        .into_iter()
        .collect();

        let mut config = DrainageConfig::default();
        apply_env_overrides_with(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.toolbox.executable, "/usr/local/bin/saga_cmd");
        assert_eq!(config.output.directory, Some(PathBuf::from("/data/out")));
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut config = DrainageConfig::default();
        apply_env_overrides_with(&mut config, |_| Some("  ".to_string()));
        assert_eq!(config.toolbox.executable, "saga_cmd");
        assert!(config.output.directory.is_none());
    }
}
