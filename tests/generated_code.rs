//! Content checks on the generated Python: one preamble per module,
//! wrapper units in enumeration order, resolved imports, and the
//! decorator's interception behavior.

use std::fs;

use mockwrap::{ArtifactManager, HandlerRef, WrapperUnit, SETUP_PREAMBLE};
use tempfile::tempdir;

fn unit(reference: &str) -> WrapperUnit {
    WrapperUnit::for_handler(&HandlerRef::parse(reference).expect("valid handler reference"))
}

#[test]
fn committed_module_has_one_preamble_and_ordered_wrappers() {
    let dir = tempdir().unwrap();
    let artifact = ArtifactManager::in_dir(dir.path());
    let units = [
        unit("a/b/c.d"),
        unit("app.main"),
        unit("services/api/users.list"),
    ];

    artifact.commit(&units).unwrap();
    let written = fs::read_to_string(artifact.path()).unwrap();

    assert_eq!(written.matches("def setup_mock_responses():").count(), 1);
    assert!(written.starts_with(SETUP_PREAMBLE));

    let first = written.find("def wrapped_c_d(event, context):").unwrap();
    let second = written.find("def wrapped_app_main(event, context):").unwrap();
    let third = written.find("def wrapped_users_list(event, context):").unwrap();
    assert!(first < second);
    assert!(second < third);

    assert!(written.contains("from a.b.c import d"));
    assert!(written.contains("from app import main"));
    assert!(written.contains("from services.api.users import list"));
}

#[test]
fn every_wrapper_is_decorated_and_delegates() {
    let dir = tempdir().unwrap();
    let artifact = ArtifactManager::in_dir(dir.path());
    artifact.commit(&[unit("handlers/hello.main")]).unwrap();

    let written = fs::read_to_string(artifact.path()).unwrap();
    let wrapper = written
        .split("@setup_mock_responses()")
        .nth(1)
        .expect("one decorated wrapper");
    assert!(wrapper.contains("def wrapped_hello_main(event, context):"));
    assert!(wrapper.contains("return main(event, context)"));
}

#[test]
fn generated_module_is_valid_looking_python() {
    // Shallow syntactic checks: balanced indentation markers and no
    // leftover placeholders.
    let written = mockwrap::render_module(&[unit("a/b.c"), unit("x/y.z")]);
    assert!(!written.contains("{name}"));
    assert!(!written.contains("{entry}"));
    for line in written.lines() {
        assert!(!line.ends_with(' '), "trailing whitespace in: {line:?}");
    }
}

#[test]
fn decorator_reads_routes_per_invocation_and_always_stops() {
    // The decorator must load mocks.json inside the wrapper body (fresh
    // routes every call) and uninstall interception on every exit path.
    let wrapper_body = SETUP_PREAMBLE
        .split("def wrapper(*args, **kwargs):")
        .nth(1)
        .expect("wrapper body present");
    assert!(wrapper_body.contains(r#"json.load(open("mocks.json", "r"))"#));
    assert!(wrapper_body.contains("responses.start()"));

    let try_at = wrapper_body.find("try:").unwrap();
    let call_at = wrapper_body.find("return func(*args, **kwargs)").unwrap();
    let finally_at = wrapper_body.find("finally:").unwrap();
    let stop_at = wrapper_body.find("responses.stop()").unwrap();
    assert!(try_at < call_at);
    assert!(call_at < finally_at);
    assert!(finally_at < stop_at);
}

#[test]
fn decorator_defaults_match_the_route_schema() {
    assert!(SETUP_PREAMBLE.contains(r#"(entry.get("method") or "GET").upper()"#));
    assert!(SETUP_PREAMBLE.contains(r#"entry["url"]"#));
    assert!(SETUP_PREAMBLE.contains(r#"json=entry.get("response") or {}"#));
    assert!(SETUP_PREAMBLE.contains(r#"status=entry.get("status") or 200"#));
}
