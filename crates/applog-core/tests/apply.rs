//! Process-global install. Kept to a single test: the global subscriber
//! is shared by every test in this binary.

use applog_core::log::{self, Logger};
use std::fs;
use std::path::Path;

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn test_apply_installs_then_replaces() {
    assert!(!log::is_configured());

    let first_base = tempfile::tempdir().unwrap();
    let first_dir = log::init(first_base.path()).unwrap();
    assert_eq!(first_dir, first_base.path().join("logs"));
    assert!(log::is_configured());

    let root = Logger::root();
    let module = Logger::get("my_module");

    root.info("first configuration");
    root.debug("console only");
    module.debug("dropped everywhere");
    module.warning("module warning");
    tracing::error!(target: "my_module::db", "via tracing");

    let first_log = first_dir.join("app.log");
    let content = read(&first_log);
    assert!(content.contains(" - root - INFO - apply.rs:"));
    assert!(content.contains("first configuration"));
    assert!(!content.contains("console only"));
    assert!(!content.contains("dropped everywhere"));
    assert!(content.contains(" - my_module - WARNING - apply.rs:"));
    assert!(content.contains(" - my_module::db - ERROR - apply.rs:"));

    // Applying again swaps destinations instead of stacking them
    let second_base = tempfile::tempdir().unwrap();
    let second_dir = log::init(second_base.path()).unwrap();
    root.info("second configuration");

    assert!(!read(&first_log).contains("second configuration"));
    let second = read(&second_dir.join("app.log"));
    assert_eq!(second.matches("second configuration").count(), 1);

    // A failed apply leaves the working configuration in place
    let broken = applog_core::build_configuration(second_base.path().join("missing"));
    assert!(log::apply(&broken).is_err());
    root.info("still routed");
    assert!(read(&second_dir.join("app.log")).contains("still routed"));
}
