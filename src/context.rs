//! Processing context: where inputs are read from and outputs are written to.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::algorithm::{Destination, LayerKind};
use crate::error::Result;

/// Execution context shared by every tool in a run.
///
/// Relative paths resolve against the output directory (destinations) or the
/// working directory (inputs). Temporary destinations land in a per-run
/// scratch directory that is created on first use.
#[derive(Debug)]
pub struct ProcessingContext {
    working_dir: PathBuf,
    output_dir: Option<PathBuf>,
    keep_temporary: bool,
    temp: Option<TempDir>,
    counter: usize,
}

impl ProcessingContext {
    /// Create a context rooted at `working_dir`.
    ///
    /// A relative root is made absolute against the current directory, so every
    /// path the context hands out stays valid for tools spawned inside it.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        Self {
            working_dir: std::path::absolute(&working_dir).unwrap_or(working_dir),
            output_dir: None,
            keep_temporary: false,
            temp: None,
            counter: 0,
        }
    }

    /// Resolve relative destinations against `dir` instead of the working directory.
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir.map(|d| self.resolve_input(&d));
        self
    }

    /// Always keep the scratch directory after the run.
    pub fn with_keep_temporary(mut self, keep: bool) -> Self {
        self.keep_temporary = keep;
        self
    }

    /// Working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Scratch directory, if one has been created.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp.as_ref().map(|t| t.path())
    }

    /// Resolve an input layer path.
    pub fn resolve_input(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    /// Turn a destination into a concrete file path, creating parent directories.
    pub fn resolve_destination(
        &mut self,
        destination: &Destination,
        name: &str,
        kind: LayerKind,
    ) -> Result<PathBuf> {
        let path = match destination {
            Destination::Path(p) => {
                let base = self.output_dir.as_ref().unwrap_or(&self.working_dir);
                let mut path = if p.is_absolute() {
                    p.clone()
                } else {
                    base.join(p)
                };
                if path.extension().is_none() {
                    path.set_extension(kind.default_extension());
                }
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                path
            }
            Destination::Temporary => {
                let index = self.counter;
                self.counter += 1;
                let file = format!("{}-{}.{}", name, index, kind.default_extension());
                self.scratch()?.join(file)
            }
        };

        tracing::debug!("{} -> {}", name, path.display());
        Ok(path)
    }

    /// Whether `path` lives in the scratch directory.
    pub fn is_temporary_path(&self, path: &Path) -> bool {
        self.temp_dir().is_some_and(|dir| path.starts_with(dir))
    }

    /// End the run.
    ///
    /// The scratch directory is kept when `outputs_are_temporary` is set or the
    /// context was configured to keep it, and its path is returned. Otherwise it
    /// is deleted together with any discarded intermediates.
    pub fn finish(self, outputs_are_temporary: bool) -> Option<PathBuf> {
        let temp = self.temp?;
        if outputs_are_temporary || self.keep_temporary {
            let path = temp.keep();
            tracing::debug!("keeping temporary outputs in {}", path.display());
            Some(path)
        } else {
            None
        }
    }

    fn scratch(&mut self) -> Result<&Path> {
        if self.temp.is_none() {
            let dir = tempfile::Builder::new().prefix("drainage-").tempdir()?;
            tracing::debug!("created scratch directory {}", dir.path().display());
            self.temp = Some(dir);
        }
        Ok(self.temp.as_ref().map(|t| t.path()).unwrap_or(&self.working_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_destinations_resolve_against_working_dir() {
        let temp = TempDir::new().unwrap();
        let mut ctx = ProcessingContext::new(temp.path());
        let path = ctx
            .resolve_destination(
                &Destination::Path("out/filled.sdat".into()),
                "FILLED",
                LayerKind::Raster,
            )
            .unwrap();
        assert_eq!(path, temp.path().join("out/filled.sdat"));
        assert!(temp.path().join("out").is_dir());
    }

    #[test]
    fn output_dir_takes_precedence() {
        let temp = TempDir::new().unwrap();
        let outputs = temp.path().join("results");
        let mut ctx = ProcessingContext::new(temp.path()).with_output_dir(Some(outputs.clone()));
        let path = ctx
            .resolve_destination(
                &Destination::Path("channels".into()),
                "CHANNELSVECT",
                LayerKind::Vector,
            )
            .unwrap();
        assert_eq!(path, outputs.join("channels.shp"));
    }

    #[test]
    fn temporary_destinations_never_collide() {
        let temp = TempDir::new().unwrap();
        let mut ctx = ProcessingContext::new(temp.path());
        let a = ctx
            .resolve_destination(&Destination::Temporary, "WSHED", LayerKind::Raster)
            .unwrap();
        let b = ctx
            .resolve_destination(&Destination::Temporary, "WSHED", LayerKind::Raster)
            .unwrap();
        assert_ne!(a, b);
        assert!(ctx.is_temporary_path(&a));
        assert_eq!(a.extension().unwrap(), "sdat");
    }

    #[test]
    fn finish_removes_scratch_unless_needed() {
        let temp = TempDir::new().unwrap();
        let mut ctx = ProcessingContext::new(temp.path());
        ctx.resolve_destination(&Destination::Temporary, "X", LayerKind::Raster)
            .unwrap();
        let scratch = ctx.temp_dir().unwrap().to_path_buf();
        assert!(ctx.finish(false).is_none());
        assert!(!scratch.exists());
    }

    #[test]
    fn finish_keeps_scratch_with_temporary_outputs() {
        let temp = TempDir::new().unwrap();
        let mut ctx = ProcessingContext::new(temp.path());
        ctx.resolve_destination(&Destination::Temporary, "X", LayerKind::Raster)
            .unwrap();
        let kept = ctx.finish(true).unwrap();
        assert!(kept.exists());
        fs::remove_dir_all(kept).unwrap();
    }

    #[test]
    fn finish_keeps_scratch_when_configured() {
        let temp = TempDir::new().unwrap();
        let mut ctx = ProcessingContext::new(temp.path()).with_keep_temporary(true);
        ctx.resolve_destination(&Destination::Temporary, "WSHED", LayerKind::Raster)
            .unwrap();
        let kept = ctx.finish(false).unwrap();
        assert!(kept.is_dir());
        fs::remove_dir_all(kept).unwrap();
    }

    #[test]
    fn relative_root_becomes_absolute() {
        let ctx = ProcessingContext::new("data").with_output_dir(Some("results".into()));
        assert!(ctx.working_dir().is_absolute());
        assert!(ctx.working_dir().ends_with("data"));
        assert_eq!(
            ctx.resolve_input(Path::new("dem.sdat")),
            std::env::current_dir().unwrap().join("data/dem.sdat")
        );
    }

    #[test]
    fn relative_output_dir_resolves_against_root() {
        let temp = TempDir::new().unwrap();
        let mut ctx =
            ProcessingContext::new(temp.path()).with_output_dir(Some("results".into()));
        let path = ctx
            .resolve_destination(
                &Destination::Path("filled".into()),
                "FILLED",
                LayerKind::Raster,
            )
            .unwrap();
        assert_eq!(path, temp.path().join("results/filled.sdat"));
    }

    #[test]
    fn finish_without_scratch_is_none() {
        let ctx = ProcessingContext::new(".").with_keep_temporary(true);
        assert!(ctx.finish(true).is_none());
    }

    #[test]
    fn relative_inputs_resolve_against_working_dir() {
        let ctx = ProcessingContext::new("/data");
        assert_eq!(
            ctx.resolve_input(Path::new("dem.sdat")),
            PathBuf::from("/data/dem.sdat")
        );
    }
}
