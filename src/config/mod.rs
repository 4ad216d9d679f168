//! Configuration loading, merging, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Environment overrides in [`env`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use drainage::config::{load_config, validate, ConfigPaths};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".drainage");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "defaults:\n  threshold: 250\n").unwrap();
//!
//! let paths = ConfigPaths { user_global: None, ..ConfigPaths::discover(temp.path()) };
//! let config = load_config(&paths).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.defaults.threshold, Some(250.0));
//! ```
//!
//! # Configuration File Locations
//!
//! Layers are merged in this order:
//! 1. User global config (`~/.drainage/config.yml`)
//! 2. Project config (`.drainage/config.yml`)
//! 3. Local overrides (`.drainage/config.local.yml`)
//! 4. A file passed with `--config`
//!
//! `DRAINAGE_SAGA_CMD` and `DRAINAGE_OUTPUT_DIR` are applied last.

pub mod env;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use env::{apply_env_overrides, apply_env_overrides_with, OUTPUT_DIR_VAR, SAGA_CMD_VAR};
pub use loader::{find_project_root, load_config, load_config_value, ConfigPaths, CONFIG_DIR};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    ChannelsConfig, DefaultsConfig, DrainageConfig, InitiationMethod, OutputConfig, OutputMode,
    ToolboxConfig,
};
pub use validator::{validate, validate_config, ValidationError};

/// Load every layer, apply environment overrides, and validate.
pub fn load_resolved(paths: &ConfigPaths) -> crate::error::Result<DrainageConfig> {
    let mut config = load_config(paths)?;
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}
