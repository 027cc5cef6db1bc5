use super::*;
use std::fs;
use tw_adapters::FsEventKind;

#[test]
fn open_loads_existing_module_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("echo@1.0.0.task"),
        r#"{"command": "echo hi"}"#,
    )
    .unwrap();

    let registry = ModuleRegistry::open(dir.path()).unwrap();
    assert!(registry.has("echo@1.0.0"));
    assert_eq!(registry.list(), vec!["echo@1.0.0".to_string()]);
}

#[test]
fn reconcile_created_registers_new_module() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModuleRegistry::open(dir.path()).unwrap();
    assert!(registry.list().is_empty());

    fs::write(dir.path().join("greet@1.0.0.task"), r#"{"command": "true"}"#).unwrap();
    registry.reconcile(&FsEvent {
        kind: FsEventKind::Created,
        file: "greet@1.0.0.task".to_string(),
    });

    assert!(registry.has("greet@1.0.0"));
}

#[test]
fn reconcile_dropped_unregisters_module() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("greet@1.0.0.task"), r#"{"command": "true"}"#).unwrap();
    let registry = ModuleRegistry::open(dir.path()).unwrap();
    assert!(registry.has("greet@1.0.0"));

    registry.reconcile(&FsEvent {
        kind: FsEventKind::Dropped,
        file: "greet@1.0.0.task".to_string(),
    });

    assert!(!registry.has("greet@1.0.0"));
}

#[test]
fn reconcile_ignores_non_qualifying_files() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModuleRegistry::open(dir.path()).unwrap();

    registry.reconcile(&FsEvent {
        kind: FsEventKind::Created,
        file: "readme.txt".to_string(),
    });

    assert!(registry.list().is_empty());
}
