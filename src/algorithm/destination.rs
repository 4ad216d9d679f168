//! Output destinations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Sentinel the host uses for "write this somewhere temporary".
pub const TEMPORARY_OUTPUT: &str = "TEMPORARY_OUTPUT";

/// Kind of layer an output holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Raster,
    Vector,
}

impl LayerKind {
    /// File extension used when the context has to pick a file name.
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Raster => "sdat",
            Self::Vector => "shp",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => write!(f, "raster"),
            Self::Vector => write!(f, "vector"),
        }
    }
}

/// Where a tool should write one of its outputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    /// Let the processing context choose a scratch path.
    #[default]
    Temporary,
    /// Write to this path (relative paths resolve against the context).
    Path(PathBuf),
}

impl Destination {
    /// Parse the host's string form. Empty strings and the sentinel mean temporary.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == TEMPORARY_OUTPUT {
            Self::Temporary
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Whether this is a temporary destination.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary)
    }

    /// The explicit path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Temporary => None,
            Self::Path(p) => Some(p),
        }
    }
}

impl From<Option<PathBuf>> for Destination {
    fn from(path: Option<PathBuf>) -> Self {
        path.map(Self::Path).unwrap_or_default()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temporary => write!(f, "{}", TEMPORARY_OUTPUT),
            Self::Path(p) => write!(f, "{}", p.display()),
        }
    }
}
