//! Discovery behavior against real directories, using a real plugin
//! artifact compiled by the build script.

use std::fs;
use std::path::Path;

use svcman_core::HookKind;
use svcman_plugin::{ExecContext, PluginExecutor, PluginRegistry};

fn fixture_artifact() -> &'static Path {
    Path::new(concat!(env!("OUT_DIR"), "/libbasic_hook.so"))
}

#[test]
fn load_discovers_valid_plugins_in_directory_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixture_artifact(), dir.path().join("hook_a.so")).unwrap();
    fs::copy(fixture_artifact(), dir.path().join("hook_b.so")).unwrap();
    fs::write(dir.path().join("broken.so"), b"garbage").unwrap();
    fs::write(dir.path().join(".hidden.so"), b"ignored").unwrap();

    let mut registry = PluginRegistry::new(dir.path());
    registry.load(&ExecContext::new()).unwrap();

    // Exactly the loadable entries, each with a resolved hook.
    assert_eq!(registry.len(), 2);
    assert!(registry.iter().all(|p| p.has_hook()));

    // Registry order is directory-iteration order, restricted to the
    // entries that loaded.
    let scan_order: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("hook_"))
        .collect();
    let loaded: Vec<&str> = registry.iter().map(|p| p.name()).collect();
    assert_eq!(loaded, scan_order);
}

#[test]
fn dispatch_through_loaded_artifact_mutates_environment() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixture_artifact(), dir.path().join("basic_hook.so")).unwrap();

    let mut registry = PluginRegistry::new(dir.path());
    registry.load(&ExecContext::new()).unwrap();
    assert_eq!(registry.len(), 1);

    unsafe { std::env::remove_var("DISCOVERY_HOOK") };
    PluginExecutor::new()
        .run(
            &registry,
            &ExecContext::new(),
            HookKind::ServiceStartDone,
            Some("sshd"),
        )
        .unwrap();

    let expected = HookKind::ServiceStartDone.as_raw().to_string();
    assert_eq!(std::env::var("DISCOVERY_HOOK").unwrap(), expected);
    unsafe { std::env::remove_var("DISCOVERY_HOOK") };
}

#[test]
fn load_skips_unloadable_and_hidden_entries() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("not-a-library.so"), b"garbage").unwrap();
    fs::write(dir.path().join("also-broken.so"), b"more garbage").unwrap();
    fs::write(dir.path().join(".hidden.so"), b"ignored").unwrap();

    let mut registry = PluginRegistry::new(dir.path());
    registry.load(&ExecContext::new()).unwrap();

    // Broken entries are skipped, non-fatally; hidden entries never tried.
    assert!(registry.is_empty());
}

#[test]
fn load_of_missing_directory_leaves_registry_empty() {
    let mut registry = PluginRegistry::new("/definitely/does/not/exist");
    registry.load(&ExecContext::new()).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn unload_is_idempotent() {
    let mut registry = PluginRegistry::new("/definitely/does/not/exist");
    registry.unload();
    registry.unload();
    assert!(registry.is_empty());
}

#[test]
fn run_on_empty_registry_is_a_no_op() {
    let registry = PluginRegistry::new("/definitely/does/not/exist");
    let result = PluginExecutor::new().run(
        &registry,
        &ExecContext::new(),
        HookKind::ServiceStartIn,
        Some("sshd"),
    );
    assert!(result.is_ok());
}
