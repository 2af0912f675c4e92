//! Python wrapper synthesis
//!
//! Pure text generation. A generated module is one fixed decorator
//! preamble shared by every wrapper, followed by one wrapper entry point
//! per target function. Nothing in this module touches the filesystem;
//! [`crate::artifact`] owns the write.

use crate::handler::HandlerRef;

/// File the generated decorator reads mocked routes from, resolved
/// against the working directory of the wrapped process on every call.
pub const MOCKS_FILE: &str = "mocks.json";

/// Decorator preamble emitted once at the top of every generated module.
///
/// On each wrapped invocation the decorator loads [`MOCKS_FILE`], starts
/// `responses` interception, registers one mocked route per entry (method
/// upper-cased with `GET` as the default, body `{}` and status `200` when
/// absent), calls through to the original handler, and uninstalls
/// interception in a `finally` block so every exit path restores real
/// networking.
pub const SETUP_PREAMBLE: &str = r#"import json

import responses


def setup_mock_responses():
    def decorator(func):
        def wrapper(*args, **kwargs):
            config = json.load(open("mocks.json", "r"))
            responses.start()
            for entry in config:
                method = getattr(responses, (entry.get("method") or "GET").upper())
                responses.add(
                    method,
                    entry["url"],
                    json=entry.get("response") or {},
                    status=entry.get("status") or 200,
                )
            try:
                return func(*args, **kwargs)
            finally:
                responses.stop()
        return wrapper
    return decorator
"#;

/// Generated source for one wrapper entry point.
///
/// The entry-point name is derived from the module and handler names, so
/// two modules exposing same-named handlers never collide inside one
/// generated file. Immutable once synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperUnit {
    name: String,
    source: String,
}

impl WrapperUnit {
    /// Synthesize the wrapper for one parsed handler reference.
    pub fn for_handler(handler: &HandlerRef) -> Self {
        let name = wrapper_name(&handler.module, &handler.entry_point);
        let source = format!(
            r#"

@setup_mock_responses()
def {name}(event, context):
    from {import_module} import {entry}
    return {entry}(event, context)
"#,
            name = name,
            import_module = handler.import_module(),
            entry = handler.entry_point,
        );
        Self { name, source }
    }

    /// Entry-point name this unit defines.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Python source text of this unit, including its decorator line.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Deterministic wrapper entry-point name for a `(module, entry_point)`
/// pair.
pub fn wrapper_name(module: &str, entry_point: &str) -> String {
    format!("wrapped_{module}_{entry_point}")
}

/// Assemble the full generated module: the preamble once, then every
/// wrapper in the order given.
pub fn render_module<'a, I>(units: I) -> String
where
    I: IntoIterator<Item = &'a WrapperUnit>,
{
    let mut module = String::from(SETUP_PREAMBLE);
    for unit in units {
        module.push_str(unit.source());
    }
    module
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(reference: &str) -> WrapperUnit {
        WrapperUnit::for_handler(&HandlerRef::parse(reference).unwrap())
    }

    #[test]
    fn wrapper_name_combines_module_and_entry_point() {
        assert_eq!(wrapper_name("c", "d"), "wrapped_c_d");
    }

    #[test]
    fn wrapper_imports_nested_module_with_dots() {
        let unit = unit("a/b/c.d");
        assert_eq!(unit.name(), "wrapped_c_d");
        assert!(unit.source().contains("def wrapped_c_d(event, context):"));
        assert!(unit.source().contains("from a.b.c import d"));
        assert!(unit.source().contains("return d(event, context)"));
    }

    #[test]
    fn root_level_handler_imports_bare_module() {
        let unit = unit("app.main");
        assert!(unit.source().contains("from app import main"));
        assert!(!unit.source().contains("from .app"));
    }

    #[test]
    fn every_wrapper_carries_the_decorator() {
        assert!(unit("x.y").source().contains("@setup_mock_responses()"));
    }

    #[test]
    fn preamble_reads_the_mocks_file() {
        assert!(SETUP_PREAMBLE.contains(MOCKS_FILE));
        assert!(SETUP_PREAMBLE.contains(r#"json.load(open("mocks.json", "r"))"#));
    }

    #[test]
    fn preamble_defaults_method_body_and_status() {
        assert!(SETUP_PREAMBLE.contains(r#"(entry.get("method") or "GET").upper()"#));
        assert!(SETUP_PREAMBLE.contains(r#"json=entry.get("response") or {}"#));
        assert!(SETUP_PREAMBLE.contains(r#"status=entry.get("status") or 200"#));
    }

    #[test]
    fn preamble_stops_interception_on_every_exit_path() {
        let try_at = SETUP_PREAMBLE.find("try:").unwrap();
        let finally_at = SETUP_PREAMBLE.find("finally:").unwrap();
        let stop_at = SETUP_PREAMBLE.find("responses.stop()").unwrap();
        assert!(try_at < finally_at);
        assert!(finally_at < stop_at);
    }

    #[test]
    fn render_concatenates_preamble_then_units_in_order() {
        let first = unit("a/b/c.d");
        let second = unit("x.y");
        let module = render_module([&first, &second]);

        assert!(module.starts_with(SETUP_PREAMBLE));
        let c_at = module.find("def wrapped_c_d").unwrap();
        let y_at = module.find("def wrapped_x_y").unwrap();
        assert!(c_at < y_at);
    }

    #[test]
    fn render_of_no_units_is_just_the_preamble() {
        let units: [&WrapperUnit; 0] = [];
        assert_eq!(render_module(units), SETUP_PREAMBLE);
    }
}
