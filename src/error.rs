//! Error types for wrapper installation and teardown

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::handler::HandlerRefError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while installing or removing mock wrappers.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested target function is not declared in the project manifest.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A declared handler reference does not name a loadable entry point.
    #[error("function '{function}' has an invalid handler: {source}")]
    InvalidHandler {
        function: String,
        #[source]
        source: HandlerRefError,
    },

    /// `start` was called on a controller that already ran. A fresh run
    /// takes a fresh controller.
    #[error("mock lifecycle already started (state: {state})")]
    AlreadyStarted { state: &'static str },

    /// Writing the generated handler module failed.
    #[error("failed to write generated handler module at `{path}`: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Removing the generated handler module failed for a reason other
    /// than the file already being gone.
    #[error("failed to remove generated handler module at `{path}`: {source}")]
    RemoveArtifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The project manifest could not be read from disk.
    #[error("failed to read project manifest `{path}`: {source}")]
    ReadProject {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The project manifest is not valid YAML for the expected shape.
    #[error("invalid project manifest `{path}`: {source}")]
    ParseProject {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
