//! Run lifecycle: wrap, hold, tear down
//!
//! [`MockLifecycle`] drives one local run. `start` resolves the
//! interpreter, plans a wrapper for every target function, rewrites the
//! registered handlers to point into the generated module, and commits
//! the artifact once at the end. `stop` removes the artifact again and is
//! idempotent, so the host's normal end-of-run and the first interrupt
//! can both trigger it in either order.

use crate::artifact::ArtifactManager;
use crate::codegen::WrapperUnit;
use crate::error::{Error, Result};
use crate::handler::HandlerRef;
use crate::project::Project;
use crate::python::{self, PythonBin};

/// Lifecycle states of one run.
///
/// A controller only ever moves forward, `Idle` to `Active` to
/// `TornDown`; a fresh run constructs a fresh controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, nothing installed yet.
    Idle,
    /// Wrappers installed, artifact on disk.
    Active,
    /// Artifact removed; the controller is spent.
    TornDown,
}

impl RunState {
    /// Stable tag for logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Active => "active",
            RunState::TornDown => "torn-down",
        }
    }
}

/// Options for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Wrap only this function instead of every declared one.
    pub function: Option<String>,
}

/// One planned rewrite: which function, and what its handler becomes.
#[derive(Debug, Clone)]
pub struct PlannedWrapper {
    /// Function name in the registry.
    pub function: String,
    /// Handler reference as declared in the manifest.
    pub original_handler: String,
    /// Reference the registration is rewritten to for the run.
    pub wrapped_handler: String,
    /// Generated wrapper source for this function.
    pub unit: WrapperUnit,
}

/// Everything `start` will apply: the interpreter choice and one planned
/// wrapper per target function, in registry order.
///
/// Building a plan reads the registry but mutates nothing and writes
/// nothing, so a failed plan leaves no trace.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub python: PythonBin,
    pub wrappers: Vec<PlannedWrapper>,
}

impl RunPlan {
    /// Plan a run against a project.
    ///
    /// `artifact_module` is the Python module name rewritten handler
    /// references point into.
    ///
    /// # Errors
    ///
    /// Fails fast on an unknown target function
    /// ([`Error::UnknownFunction`]) or a malformed handler reference
    /// ([`Error::InvalidHandler`]).
    pub fn build(project: &Project, options: &RunOptions, artifact_module: &str) -> Result<Self> {
        let python = python::locate(
            project.python_override(),
            project.provider.runtime.as_deref(),
        );

        let targets: Vec<String> = match &options.function {
            Some(name) => vec![name.clone()],
            None => project.function_names().map(str::to_string).collect(),
        };

        let mut wrappers = Vec::with_capacity(targets.len());
        for name in targets {
            let config = project.function(&name)?;
            let handler =
                HandlerRef::parse(&config.handler).map_err(|source| Error::InvalidHandler {
                    function: name.clone(),
                    source,
                })?;
            let unit = WrapperUnit::for_handler(&handler);
            wrappers.push(PlannedWrapper {
                wrapped_handler: format!("{artifact_module}.{}", unit.name()),
                original_handler: config.handler.clone(),
                function: name,
                unit,
            });
        }

        Ok(Self { python, wrappers })
    }

    /// Full Python source the plan would commit.
    pub fn rendered(&self) -> String {
        crate::codegen::render_module(self.wrappers.iter().map(|wrapper| &wrapper.unit))
    }
}

/// Controller for one run's generated artifact.
///
/// Owns the artifact exclusively while it lives. Dropping a still-active
/// controller removes the artifact as a last resort, so a panic or early
/// return in the host does not leave the generated module behind.
#[derive(Debug)]
pub struct MockLifecycle {
    artifact: ArtifactManager,
    state: RunState,
}

impl MockLifecycle {
    /// Controller with the artifact at its well-known path in the current
    /// working directory.
    pub fn new() -> Self {
        Self::with_artifact(ArtifactManager::new())
    }

    /// Controller over an explicit artifact location.
    pub fn with_artifact(artifact: ArtifactManager) -> Self {
        Self {
            artifact,
            state: RunState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The artifact this controller owns.
    pub fn artifact(&self) -> &ArtifactManager {
        &self.artifact
    }

    /// Install mock wrappers for this run.
    ///
    /// Plans the run, rewrites each target function's registered handler
    /// to its generated entry point, then commits the artifact once. On
    /// a planning failure nothing has been mutated or written; the host
    /// is expected to halt the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] when called on a controller that
    /// already ran, plus any planning or write error.
    pub fn start(&mut self, project: &mut Project, options: &RunOptions) -> Result<RunPlan> {
        if self.state != RunState::Idle {
            return Err(Error::AlreadyStarted {
                state: self.state.as_str(),
            });
        }

        let plan = RunPlan::build(project, options, self.artifact.module_name())?;

        for wrapper in &plan.wrappers {
            project.function_mut(&wrapper.function)?.handler = wrapper.wrapped_handler.clone();
            tracing::debug!(
                function = %wrapper.function,
                from = %wrapper.original_handler,
                to = %wrapper.wrapped_handler,
                "rewrote handler"
            );
        }

        let units: Vec<WrapperUnit> = plan
            .wrappers
            .iter()
            .map(|wrapper| wrapper.unit.clone())
            .collect();
        self.artifact.commit(&units)?;
        self.state = RunState::Active;

        tracing::info!(
            python = %plan.python.bin,
            functions = plan.wrappers.len(),
            artifact = %self.artifact.path().display(),
            "mock responses installed"
        );
        Ok(plan)
    }

    /// Tear the run down.
    ///
    /// The first call on an active controller removes the artifact and
    /// moves to `TornDown`; every later call, and any call on a
    /// controller that never started, is a no-op. Both teardown triggers
    /// funnel here, so neither needs to know whether the other ran.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoveArtifact`] when the artifact exists but
    /// cannot be deleted; the controller stays `Active` so the call can
    /// be retried.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != RunState::Active {
            return Ok(());
        }
        self.artifact.remove()?;
        self.state = RunState::TornDown;
        tracing::info!("mock responses removed");
        Ok(())
    }
}

impl Default for MockLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MockLifecycle {
    fn drop(&mut self) {
        // Backstop only; the host is expected to call stop itself.
        if self.state == RunState::Active {
            if let Err(err) = self.stop() {
                tracing::warn!(error = %err, "failed to remove generated module during drop");
            }
        }
    }
}
