//! On-disk lifecycle of the generated handler module

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::codegen::{render_module, WrapperUnit};
use crate::error::{Error, Result};

/// Module stem of the generated artifact. Registered handlers are
/// rewritten to `__mock_responses_handler.wrapped_...` for the duration
/// of a run.
pub const ARTIFACT_MODULE: &str = "__mock_responses_handler";

/// Owns the single generated Python module for one run.
///
/// The artifact is shared on-disk state: written in full by [`commit`],
/// deleted by [`remove`], never mutated in place. `remove` treats a
/// missing file as success, so the normal shutdown path and the interrupt
/// path can both call it without coordinating.
///
/// [`commit`]: ArtifactManager::commit
/// [`remove`]: ArtifactManager::remove
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    path: PathBuf,
}

impl ArtifactManager {
    /// Manage the artifact at its well-known path in the current working
    /// directory.
    pub fn new() -> Self {
        Self::in_dir(".")
    }

    /// Manage the artifact under an explicit directory. The file name
    /// itself is fixed; tests point this at a temporary directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{ARTIFACT_MODULE}.py")),
        }
    }

    /// Path of the generated module.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Python module name the generated entry points live in.
    pub fn module_name(&self) -> &'static str {
        ARTIFACT_MODULE
    }

    /// Render and write the full generated module, replacing any existing
    /// artifact. A stale copy from an earlier run is overwritten whole.
    ///
    /// The content goes to a sibling `.tmp` file first and is renamed
    /// over the destination, so a crash mid-write cannot leave a torn
    /// module for the Python side to import.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WriteArtifact`] when the write or rename fails.
    pub fn commit(&self, units: &[WrapperUnit]) -> Result<()> {
        let rendered = render_module(units);
        let tmp = self.path.with_extension("py.tmp");
        fs::write(&tmp, rendered).map_err(|source| Error::WriteArtifact {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| Error::WriteArtifact {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            units = units.len(),
            "wrote generated handler module"
        );
        Ok(())
    }

    /// Delete the artifact if it exists. Deleting an absent artifact is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoveArtifact`] for any failure other than the
    /// file already being gone.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed generated handler module");
                Ok(())
            }
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::RemoveArtifact {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Default for ArtifactManager {
    fn default() -> Self {
        Self::new()
    }
}
