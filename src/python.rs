//! Python interpreter discovery
//!
//! The run needs to know which interpreter the host will hand wrapped
//! invocations to. Resolution walks an ordered candidate chain: an
//! explicit `pythonBin` override, then the manifest's declared runtime
//! when an executable by that name is on `PATH`, then a hardcoded
//! fallback. The winner is returned as data together with where it came
//! from; resolution itself never fails and never gates wrapper synthesis.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Interpreter used when nothing better is configured or discoverable.
pub const DEFAULT_PYTHON: &str = "python";

/// Which candidate in the resolution chain produced the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PythonSource {
    /// Explicit `pythonBin` from the project's custom settings.
    CustomSetting,
    /// The manifest's `provider.runtime`, found on `PATH`.
    DeclaredRuntime,
    /// The hardcoded default.
    Fallback,
}

impl PythonSource {
    /// Stable tag for logs and run summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            PythonSource::CustomSetting => "pythonBin",
            PythonSource::DeclaredRuntime => "runtime",
            PythonSource::Fallback => "default",
        }
    }
}

/// A resolved interpreter choice with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonBin {
    /// Binary name or path to invoke.
    pub bin: String,
    /// Candidate that won the resolution.
    pub source: PythonSource,
}

/// Resolve the interpreter for a run: first candidate with a value wins.
pub fn locate(override_bin: Option<&str>, declared_runtime: Option<&str>) -> PythonBin {
    from_custom_setting(override_bin)
        .or_else(|| from_declared_runtime(declared_runtime))
        .unwrap_or_else(fallback)
}

fn from_custom_setting(bin: Option<&str>) -> Option<PythonBin> {
    let bin = bin?;
    tracing::debug!(python = bin, "using interpreter from pythonBin setting");
    Some(PythonBin {
        bin: bin.to_string(),
        source: PythonSource::CustomSetting,
    })
}

fn from_declared_runtime(runtime: Option<&str>) -> Option<PythonBin> {
    let runtime = runtime?;
    if !is_discoverable(runtime) {
        tracing::debug!(runtime, "declared runtime not found on PATH, skipping");
        return None;
    }
    tracing::debug!(python = runtime, "using interpreter named by provider runtime");
    Some(PythonBin {
        bin: runtime.to_string(),
        source: PythonSource::DeclaredRuntime,
    })
}

fn fallback() -> PythonBin {
    tracing::debug!(python = DEFAULT_PYTHON, "using default interpreter");
    PythonBin {
        bin: DEFAULT_PYTHON.to_string(),
        source: PythonSource::Fallback,
    }
}

/// Whether an executable by this name exists in some `PATH` entry.
pub fn is_discoverable(name: &str) -> bool {
    match env::var_os("PATH") {
        Some(path) => search_dirs(name, &path).is_some(),
        None => false,
    }
}

/// Probe each `PATH` entry in order, with a Windows `.exe` fallback for
/// bare names.
fn search_dirs(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    for dir in env::split_paths(path_var) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        if cfg!(windows) && Path::new(name).extension().is_none() {
            let candidate = dir.join(format!("{name}.exe"));
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
