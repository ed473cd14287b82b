use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::OutputConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct OutputArtifacts {
    pub directory: PathBuf,
    pub animation: PathBuf,
    pub full_orbit: PathBuf,
    pub zoomed_orbit: PathBuf,
}

impl OutputArtifacts {
    /// Paths in the order they are written.
    pub fn all(&self) -> [&Path; 3] {
        [
            self.animation.as_path(),
            self.full_orbit.as_path(),
            self.zoomed_orbit.as_path(),
        ]
    }

    pub fn existing(&self) -> Vec<&Path> {
        self.all().into_iter().filter(|path| path.exists()).collect()
    }
}

pub fn resolve_artifacts(directory: &Path, output: &OutputConfig) -> OutputArtifacts {
    OutputArtifacts {
        directory: directory.to_path_buf(),
        animation: resolve_path(directory, &output.animation),
        full_orbit: resolve_path(directory, &output.full_orbit),
        zoomed_orbit: resolve_path(directory, &output.zoomed_orbit),
    }
}

fn resolve_path(base: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        base.join(relative)
    }
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create output directory {}", path.display()))?;
    }
    Ok(())
}
