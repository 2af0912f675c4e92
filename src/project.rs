//! Project manifest: the host-side function registry
//!
//! A `serverless.yml`-compatible subset covering exactly what a run
//! needs: the declared functions with their handler references, the
//! provider's runtime name, and this tool's settings under
//! `custom.mockwrap`. Unknown keys are ignored so real manifests load
//! unchanged, and functions keep their declaration order.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A loaded project manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub custom: Custom,
    /// Declared functions, in declaration order.
    #[serde(default)]
    pub functions: IndexMap<String, FunctionConfig>,
}

/// The manifest's `provider` section, reduced to the runtime name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider {
    #[serde(default)]
    pub runtime: Option<String>,
}

/// The manifest's `custom` section, reduced to this tool's namespace.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Custom {
    #[serde(default)]
    pub mockwrap: MockwrapSettings,
}

/// Per-run settings under `custom.mockwrap`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MockwrapSettings {
    /// Explicit interpreter override; first candidate in interpreter
    /// resolution.
    #[serde(rename = "pythonBin", default)]
    pub python_bin: Option<String>,
}

/// One declared function. Only the handler reference is interpreted
/// here; the rest of the declaration is the host's business.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionConfig {
    pub handler: String,
}

impl Project {
    /// Load a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadProject`] when the file cannot be read and
    /// [`Error::ParseProject`] when it is not valid YAML for this shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::ReadProject {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|source| Error::ParseProject {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a manifest from YAML text.
    pub fn from_yaml_str(raw: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Names of every declared function, in declaration order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Look up one declared function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFunction`] when the name is not declared.
    pub fn function(&self, name: &str) -> Result<&FunctionConfig> {
        self.functions
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))
    }

    /// Look up one declared function for in-place mutation. The lifecycle
    /// rewrites `handler` through this for the duration of a run.
    pub fn function_mut(&mut self, name: &str) -> Result<&mut FunctionConfig> {
        self.functions
            .get_mut(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))
    }

    /// Explicit interpreter override, when configured.
    pub fn python_override(&self) -> Option<&str> {
        self.custom.mockwrap.python_bin.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
service: demo

provider:
  name: aws
  runtime: python3.11

custom:
  mockwrap:
    pythonBin: python3

functions:
  hello:
    handler: handlers/hello.main
    events:
      - http:
          path: /hello
          method: get
  status:
    handler: handlers/status.check
"#;

    #[test]
    fn parses_a_realistic_manifest() {
        let project = Project::from_yaml_str(MANIFEST).unwrap();
        assert_eq!(project.service.as_deref(), Some("demo"));
        assert_eq!(project.provider.runtime.as_deref(), Some("python3.11"));
        assert_eq!(project.python_override(), Some("python3"));
        assert_eq!(
            project.function("hello").unwrap().handler,
            "handlers/hello.main"
        );
    }

    #[test]
    fn functions_keep_declaration_order() {
        let project = Project::from_yaml_str(MANIFEST).unwrap();
        let names: Vec<_> = project.function_names().collect();
        assert_eq!(names, vec!["hello", "status"]);
    }

    #[test]
    fn unknown_function_lookup_fails() {
        let project = Project::from_yaml_str(MANIFEST).unwrap();
        let err = project.function("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownFunction(name) if name == "nope"));
    }

    #[test]
    fn missing_sections_default_cleanly() {
        let project = Project::from_yaml_str("functions: {}\n").unwrap();
        assert!(project.functions.is_empty());
        assert_eq!(project.python_override(), None);
        assert_eq!(project.provider.runtime, None);
    }

    #[test]
    fn unrelated_custom_keys_are_ignored() {
        let raw = r#"
custom:
  mockwrap:
    pythonBin: pypy3
  someOtherPlugin:
    level: 11
functions:
  f:
    handler: a.b
"#;
        let project = Project::from_yaml_str(raw).unwrap();
        assert_eq!(project.python_override(), Some("pypy3"));
    }

    #[test]
    fn function_without_handler_is_rejected() {
        let raw = "functions:\n  broken:\n    timeout: 30\n";
        assert!(Project::from_yaml_str(raw).is_err());
    }
}
