//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! various locations in the correct priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::DrainageConfig;
use crate::error::{DrainageError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".drainage";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global config (`~/.drainage/config.yml`)
/// 2. Project config (`.drainage/config.yml`)
/// 3. Local overrides (`.drainage/config.local.yml`)
/// 4. Explicit `--config` file
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config: ~/.drainage/config.yml
    pub user_global: Option<PathBuf>,

    /// Project config: .drainage/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .drainage/config.local.yml
    pub project_local: Option<PathBuf>,

    /// File named on the command line.
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: dirs::home_dir()
                .map(|home| home.join(CONFIG_DIR).join("config.yml"))
                .filter(|p| p.exists()),
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
            explicit: None,
        }
    }

    /// Add an explicit config file with the highest priority.
    pub fn with_explicit(mut self, path: Option<&Path>) -> Self {
        self.explicit = path.map(Path::to_path_buf);
        self
    }

    /// Returns all config paths in merge order.
    ///
    /// The explicit path is included even if it does not exist, so that
    /// loading reports it as missing.
    pub fn all(&self) -> Vec<&PathBuf> {
        [
            &self.user_global,
            &self.project,
            &self.project_local,
            &self.explicit,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// Looks for a `.drainage` directory; returns None if there is none.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load a config file as raw YAML Value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DrainageError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DrainageError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| DrainageError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge every config layer.
///
/// Missing discovered files are skipped; with no files at all the result is
/// the default configuration.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the explicit file does not exist.
/// Returns `ConfigParseError` if any file is invalid.
pub fn load_config(paths: &ConfigPaths) -> Result<DrainageConfig> {
    let mut layers = Vec::new();
    for path in paths.all() {
        tracing::debug!("loading config {}", path.display());
        layers.push(load_config_value(path)?);
    }

    let merged = merge_configs(&layers);
    let source = paths
        .all()
        .last()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("config.yml"));

    serde_yaml::from_value(merged).map_err(|e| DrainageError::ConfigParseError {
        path: source,
        message: format!("Failed to parse merged config: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        temp
    }

    #[test]
    fn discover_finds_project_and_local() {
        let temp = project_with(&[("config.yml", "{}"), ("config.local.yml", "{}")]);
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.project.is_some());
        assert!(paths.project_local.is_some());
    }

    #[test]
    fn local_overrides_project() {
        let temp = project_with(&[
            ("config.yml", "defaults:\n  threshold: 500\n  min_slope: 0.2\n"),
            ("config.local.yml", "defaults:\n  threshold: 50\n"),
        ]);
        let paths = ConfigPaths {
            user_global: None,
            ..ConfigPaths::discover(temp.path())
        };

        let config = load_config(&paths).unwrap();
        assert_eq!(config.defaults.threshold, Some(50.0));
        assert_eq!(config.defaults.min_slope, Some(0.2));
    }

    #[test]
    fn explicit_file_wins() {
        let temp = project_with(&[("config.yml", "toolbox:\n  executable: a\n")]);
        let explicit = temp.path().join("ci.yml");
        fs::write(&explicit, "toolbox:\n  executable: b\n").unwrap();
        let paths = ConfigPaths {
            user_global: None,
            ..ConfigPaths::discover(temp.path())
        }
        .with_explicit(Some(&explicit));

        assert_eq!(load_config(&paths).unwrap().toolbox.executable, "b");
    }

    #[test]
    fn missing_explicit_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::default().with_explicit(Some(&temp.path().join("nope.yml")));
        assert!(matches!(
            load_config(&paths),
            Err(DrainageError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn no_files_gives_defaults() {
        let config = load_config(&ConfigPaths::default()).unwrap();
        assert_eq!(config, DrainageConfig::default());
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = project_with(&[("config.yml", "toolbox: [unclosed")]);
        let paths = ConfigPaths {
            user_global: None,
            ..ConfigPaths::discover(temp.path())
        };
        assert!(matches!(
            load_config(&paths),
            Err(DrainageError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn find_project_root_walks_up() {
        let temp = project_with(&[]);
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested), Some(temp.path().to_path_buf()));
    }
}
