//! Handler reference parsing
//!
//! A handler reference is the string a project manifest uses to point at a
//! Python entry point: `path/to/module.entry_point`. The final
//! slash-separated segment names the module file and the callable inside
//! it, joined by exactly one dot; everything before that segment is the
//! directory path, `"."` when absent.

use thiserror::Error;

/// Errors produced when a handler reference cannot be decomposed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerRefError {
    /// The final segment contains no dot, so there is no entry-point name.
    #[error("missing entry point in '{0}' (expected 'path/to/module.entry_point')")]
    MissingEntryPoint(String),

    /// The final segment contains more than one dot.
    #[error("ambiguous entry point in '{0}' (expected exactly one '.' in the final segment)")]
    AmbiguousEntryPoint(String),

    /// The module name or the entry-point name is empty.
    #[error("empty module or entry-point name in '{0}'")]
    EmptyComponent(String),
}

/// A handler reference decomposed into its structural parts.
///
/// `directory/module.entry_point` always round-trips to an import the
/// target Python process can load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRef {
    /// Directory path holding the module, POSIX-style. `"."` when the
    /// reference has no directory component.
    pub directory: String,
    /// Module (file) name, without extension.
    pub module: String,
    /// Name of the callable inside the module.
    pub entry_point: String,
}

impl HandlerRef {
    /// Decompose a full handler reference.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerRefError`] when the final segment has no dot,
    /// more than one dot, or an empty name on either side of it.
    pub fn parse(reference: &str) -> Result<Self, HandlerRefError> {
        let (directory, filename) = match reference.rsplit_once('/') {
            Some((dirs, last)) => (if dirs.is_empty() { "." } else { dirs }, last),
            None => (".", reference),
        };

        let mut parts = filename.split('.');
        let module = parts.next().unwrap_or_default();
        let entry_point = match parts.next() {
            Some(entry) => entry,
            None => return Err(HandlerRefError::MissingEntryPoint(reference.to_string())),
        };
        if parts.next().is_some() {
            return Err(HandlerRefError::AmbiguousEntryPoint(reference.to_string()));
        }
        if module.is_empty() || entry_point.is_empty() {
            return Err(HandlerRefError::EmptyComponent(reference.to_string()));
        }

        Ok(Self {
            directory: directory.to_string(),
            module: module.to_string(),
            entry_point: entry_point.to_string(),
        })
    }

    /// Dotted import path of the original module, in Python's module
    /// system rather than the filesystem's: `a/b` + `c` becomes `a.b.c`,
    /// and a root-level handler is just `c`.
    pub fn import_module(&self) -> String {
        if self.directory == "." {
            self.module.clone()
        } else {
            format!("{}.{}", self.directory.replace('/', "."), self.module)
        }
    }
}
