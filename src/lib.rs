//! Mockwrap: recorded HTTP responses for offline function runs
//!
//! Given a project manifest that declares Python functions and their
//! handler references, mockwrap generates one Python module that wraps
//! every target handler in a `responses`-based interception decorator,
//! rewrites the registered handlers to point at the generated wrappers
//! for the duration of the run, and removes the module again when the
//! run ends, normally or on the first interrupt.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               MockLifecycle                 │
//! │                                             │
//! │  handler   - handler reference parsing      │
//! │  codegen   - wrapper/decorator synthesis    │
//! │  artifact  - generated module on disk       │
//! │  python    - interpreter discovery          │
//! │  project   - manifest / function registry   │
//! │                                             │
//! ├─────────────────────────────────────────────┤
//! │     Wrapped handlers (Python process)       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The host's "run starting" hook maps to [`MockLifecycle::start`] and
//! its "run ended" hook, or the first Ctrl+C, to
//! [`MockLifecycle::stop`]. At invocation time the wrapped handlers read
//! their mocked routes from `mocks.json` in the working directory:
//!
//! ```json
//! [
//!   {
//!     "method": "GET",
//!     "url": "https://api.example.com/greeting",
//!     "response": { "message": "hello" },
//!     "status": 200
//!   }
//! ]
//! ```

pub mod artifact;
pub mod codegen;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod project;
pub mod python;

pub use artifact::{ArtifactManager, ARTIFACT_MODULE};
pub use codegen::{render_module, WrapperUnit, MOCKS_FILE, SETUP_PREAMBLE};
pub use error::{Error, Result};
pub use handler::{HandlerRef, HandlerRefError};
pub use lifecycle::{MockLifecycle, PlannedWrapper, RunOptions, RunPlan, RunState};
pub use project::Project;
pub use python::{PythonBin, PythonSource};
