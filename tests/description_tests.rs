use serde_json::json;
use std::fs;
use std::path::Path;
use sysdiff::{SystemDescription, Value};

fn sample_raw() -> serde_json::Value {
    json!({
        "os": {"name": "openSUSE", "version": "13.2", "architecture": "x86_64"},
        "packages": {
            "_attributes": {"package_system": "rpm"},
            "_elements": [{"name": "bash", "version": "4.3"}]
        },
        "unmanaged_files": {
            "extracted": false,
            "files": [{"name": "/etc/motd", "user": "root"}]
        },
        "meta": {"format_version": 10}
    })
}

#[test]
fn test_from_raw_decodes_declared_scopes() {
    let description = SystemDescription::from_raw("machine_a", &sample_raw()).unwrap();

    let os = description.scope("os").unwrap().as_record().unwrap();
    assert_eq!(os.kind(), "os");

    let packages = description
        .scope("packages")
        .unwrap()
        .as_collection()
        .unwrap();
    assert_eq!(packages.kind(), "packages");
    assert_eq!(
        packages.elements()[0].as_record().unwrap().kind(),
        "rpm_package"
    );

    let files = description
        .scope("unmanaged_files")
        .unwrap()
        .as_record()
        .unwrap();
    assert_eq!(files.kind(), "unmanaged_files");
}

#[test]
fn test_meta_is_not_a_scope() {
    let description = SystemDescription::from_raw("machine_a", &sample_raw()).unwrap();
    let names: Vec<_> = description.scope_names().collect();
    assert!(!names.contains(&"meta"));
    assert!(description.meta().is_some());
}

#[test]
fn test_undeclared_scope_decodes_generically() {
    let raw = json!({"something_new": {"answer": 42}});
    let description = SystemDescription::from_raw("machine_a", &raw).unwrap();

    let scope = description.scope("something_new").unwrap();
    assert_eq!(scope.as_record().unwrap().kind(), "record");
}

#[test]
fn test_scopes_carry_scope_reference() {
    let description = SystemDescription::from_raw("machine_a", &sample_raw()).unwrap();

    let packages = description
        .scope("packages")
        .unwrap()
        .as_collection()
        .unwrap();
    assert_eq!(packages.scope().unwrap().name(), "packages");
    assert_eq!(
        packages.elements()[0]
            .as_record()
            .unwrap()
            .scope()
            .unwrap()
            .name(),
        "packages"
    );
}

#[test]
fn test_round_trip() {
    let raw = sample_raw();
    let description = SystemDescription::from_raw("machine_a", &raw).unwrap();
    assert_eq!(description.to_raw(), raw);
}

#[test]
fn test_decode_error_propagates() {
    let raw = json!({"os": {"name": "openSUSE", "mood": "great"}});
    let err = SystemDescription::from_raw("machine_a", &raw).unwrap_err();
    assert!(err.to_string().contains("mood"));
}

#[test]
fn test_top_level_must_be_object() {
    assert!(SystemDescription::from_raw("machine_a", &json!([1, 2])).is_err());
}

#[test]
fn test_load_names_description_after_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machine_a.json");
    fs::write(&path, sample_raw().to_string()).unwrap();

    let description = SystemDescription::load(&path).unwrap();
    assert_eq!(description.name(), "machine_a");
    assert!(description.scope("packages").is_some());
}

#[test]
fn test_load_missing_file() {
    let err = SystemDescription::load(Path::new("/nonexistent/machine.json")).unwrap_err();
    assert!(err.to_string().contains("File not found"));
}

#[test]
fn test_load_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{not json").unwrap();

    let err = SystemDescription::load(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid JSON"));
}

#[test]
fn test_set_scope_attaches_reference() {
    let mut description = SystemDescription::new("machine_a");
    let packages = sysdiff::Collection::from_raw(
        &sysdiff::scopes::PACKAGES,
        &json!([{"name": "bash", "version": "4.3"}]),
    )
    .unwrap();
    description.set_scope("packages", Value::Collection(packages));

    let stored = description
        .scope("packages")
        .unwrap()
        .as_collection()
        .unwrap();
    assert_eq!(stored.scope().unwrap().name(), "packages");
}
