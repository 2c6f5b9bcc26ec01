use serde_json::json;
use sysdiff::scopes::{OS, PACKAGES, UNMANAGED_FILES};
use sysdiff::{
    compare_scope, compare_values, extract_changed_pairs, AttributePolicy, AttributeSpec,
    Collection, CompareError, CompareMode, Record, RecordSchema, SystemDescription, Value,
};

fn packages(raw: serde_json::Value) -> Collection {
    Collection::from_raw(&PACKAGES, &raw).unwrap()
}

#[test]
fn test_diff_symmetry() {
    let a = packages(json!([
        {"name": "bash", "version": "4.3"},
        {"name": "vim", "version": "7.4"}
    ]));
    let b = packages(json!([
        {"name": "bash", "version": "4.4"},
        {"name": "vim", "version": "7.4"}
    ]));

    let forward = a.compare_with(&b).unwrap();
    let backward = b.compare_with(&a).unwrap();

    assert_eq!(forward.only_in_a, backward.only_in_b);
    assert_eq!(forward.only_in_b, backward.only_in_a);
    assert_eq!(forward.common, backward.common);
}

#[test]
fn test_diff_completeness() {
    let a = packages(json!([
        {"name": "bash", "version": "4.3"},
        {"name": "vim", "version": "7.4"}
    ]));
    let b = packages(json!([
        {"name": "vim", "version": "7.4"},
        {"name": "zsh", "version": "5.0"}
    ]));

    let result = a.compare_with(&b).unwrap();
    let only_a = result.only_in_a.unwrap();
    let only_b = result.only_in_b.unwrap();
    let common = result.common.unwrap();

    let mut recovered_a: Vec<Value> = only_a.as_collection().unwrap().elements().to_vec();
    recovered_a.extend_from_slice(common.as_collection().unwrap().elements());
    for element in a.elements() {
        assert!(recovered_a.contains(element));
    }
    assert_eq!(recovered_a.len(), a.len());

    let mut recovered_b: Vec<Value> = only_b.as_collection().unwrap().elements().to_vec();
    recovered_b.extend_from_slice(common.as_collection().unwrap().elements());
    for element in b.elements() {
        assert!(recovered_b.contains(element));
    }
    assert_eq!(recovered_b.len(), b.len());
}

#[test]
fn test_collapse_rule_identical_collections() {
    let raw = json!({
        "_attributes": {"package_system": "rpm"},
        "_elements": [{"name": "bash", "version": "4.3"}]
    });
    let a = packages(raw.clone());
    let b = packages(raw);

    let result = a.compare_with(&b).unwrap();
    assert!(result.only_in_a.is_none());
    assert!(result.only_in_b.is_none());
    assert!(result.changed.is_none());
    assert_eq!(result.common, Some(Value::Collection(a)));
}

#[test]
fn test_attribute_only_collection_diffed_against_itself() {
    let raw = json!({"_attributes": {"package_system": "rpm"}, "_elements": []});
    let a = packages(raw.clone());
    let b = packages(raw);

    let result = a.compare_with(&b).unwrap();
    let common = result.common.expect("common must be present, not absent");
    let common = common.as_collection().unwrap();
    assert_eq!(common.len(), 0);
    assert_eq!(
        common.get_attribute("package_system"),
        Some(&Value::String("rpm".to_string()))
    );
}

#[test]
fn test_changed_partition_is_never_populated() {
    // the base algorithm does not pair differing versions of the same
    // element: a version bump is one removal plus one addition
    let a = packages(json!([{"name": "bash", "version": "4.3"}]));
    let b = packages(json!([{"name": "bash", "version": "4.4"}]));

    let result = a.compare_with(&b).unwrap();
    assert_eq!(result.only_in_a, Some(Value::Collection(a)));
    assert_eq!(result.only_in_b, Some(Value::Collection(b)));
    assert!(result.changed.is_none());
    assert!(result.common.is_none());
}

#[test]
fn test_collection_kind_mismatch_is_rejected() {
    let a = packages(json!([]));
    let b = Collection::from_raw(&sysdiff::scopes::USERS, &json!([])).unwrap();

    let err = a.compare_with(&b).unwrap_err();
    assert!(matches!(err, CompareError::KindMismatch { .. }));
}

#[test]
fn test_record_collection_mismatch_is_rejected() {
    let record = Value::Record(Record::from_raw(&OS, &json!({"name": "openSUSE"})).unwrap());
    let collection = Value::Collection(packages(json!([])));

    let err = compare_values(&record, &collection).unwrap_err();
    assert!(matches!(err, CompareError::KindMismatch { .. }));
}

#[test]
fn test_atomic_record_comparison() {
    let a = Value::Record(
        Record::from_raw(&OS, &json!({"name": "openSUSE", "version": "13.2"})).unwrap(),
    );
    let b = Value::Record(
        Record::from_raw(&OS, &json!({"name": "openSUSE", "version": "42.1"})).unwrap(),
    );

    let result = compare_values(&a, &a.clone()).unwrap();
    assert_eq!(result.common, Some(a.clone()));

    let result = compare_values(&a, &b).unwrap();
    assert_eq!(result.only_in_a, Some(a));
    assert_eq!(result.only_in_b, Some(b));
    assert!(result.common.is_none());
}

#[test]
fn test_file_scope_extracted_flag_splits() {
    let a = Value::Record(
        Record::from_raw(
            &UNMANAGED_FILES,
            &json!({
                "extracted": true,
                "files": [{"name": "/etc/passwd", "user": "root"}]
            }),
        )
        .unwrap(),
    );
    let b = Value::Record(
        Record::from_raw(
            &UNMANAGED_FILES,
            &json!({
                "extracted": false,
                "files": [{"name": "/etc/passwd", "user": "root"}]
            }),
        )
        .unwrap(),
    );

    let result = compare_values(&a, &b).unwrap();

    let only_a = result.only_in_a.unwrap();
    let only_a = only_a.as_record().unwrap();
    assert_eq!(only_a.get("extracted"), Some(&Value::Bool(true)));
    assert!(only_a.get("files").is_none());

    let only_b = result.only_in_b.unwrap();
    assert_eq!(
        only_b.as_record().unwrap().get("extracted"),
        Some(&Value::Bool(false))
    );

    let common = result.common.unwrap();
    let files = common.as_record().unwrap().get("files").unwrap();
    assert_eq!(files.as_collection().unwrap().len(), 1);
    assert!(result.changed.is_none());
}

#[test]
fn test_file_scope_identical_collapses_to_common() {
    let raw = json!({"extracted": false, "files": [{"name": "/etc/motd"}]});
    let a = Value::Record(Record::from_raw(&UNMANAGED_FILES, &raw).unwrap());

    let result = compare_values(&a, &a.clone()).unwrap();
    assert!(result.only_in_a.is_none());
    assert!(result.only_in_b.is_none());
    let common = result.common.unwrap();
    let common = common.as_record().unwrap();
    assert_eq!(common.get("extracted"), Some(&Value::Bool(false)));
    assert!(common.get("files").is_some());
}

// A composite kind whose allow-list grew past its comparison lists: the
// comparison must fail loudly instead of silently dropping the attribute.
static SNAPSHOT: RecordSchema = RecordSchema {
    kind: "snapshot",
    attributes: AttributePolicy::Declared(&[
        AttributeSpec {
            name: "extracted",
            element_type: None,
        },
        AttributeSpec {
            name: "revision",
            element_type: None,
        },
    ]),
    compare: CompareMode::Composite {
        scalars: &["extracted"],
        collections: &[],
    },
};

#[test]
fn test_composite_unknown_attribute_is_a_schema_error() {
    let a = Value::Record(
        Record::from_raw(&SNAPSHOT, &json!({"extracted": true, "revision": "r1"})).unwrap(),
    );
    let b = Value::Record(
        Record::from_raw(&SNAPSHOT, &json!({"extracted": true, "revision": "r2"})).unwrap(),
    );

    let err = compare_values(&a, &b).unwrap_err();
    match err {
        CompareError::UnknownAttribute { kind, name } => {
            assert_eq!(kind, "snapshot");
            assert_eq!(name, "revision");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_compare_scope_present_on_one_side() {
    let mut a = SystemDescription::new("machine_a");
    a.set_scope("packages", Value::Collection(packages(json!([
        {"name": "bash", "version": "4.3"}
    ]))));
    let b = SystemDescription::new("machine_b");

    let comparison = compare_scope(&a, &b, "packages").unwrap();
    assert!(comparison.result.only_in_a.is_some());
    assert!(comparison.result.only_in_b.is_none());
    assert!(comparison.result.common.is_none());
    assert!(comparison.result.changed.is_none());
    assert!(comparison.has_differences());

    let comparison = compare_scope(&b, &a, "packages").unwrap();
    assert!(comparison.result.only_in_a.is_none());
    assert!(comparison.result.only_in_b.is_some());
}

#[test]
fn test_compare_scope_absent_on_both_sides() {
    let a = SystemDescription::new("machine_a");
    let b = SystemDescription::new("machine_b");

    let comparison = compare_scope(&a, &b, "packages").unwrap();
    assert!(!comparison.has_differences());
    assert_eq!(comparison.result.to_raw(), json!({}));
}

#[test]
fn test_comparison_to_raw_uses_present_partitions_only() {
    let a = packages(json!([{"name": "bash", "version": "4.3"}]));
    let b = packages(json!([{"name": "bash", "version": "4.4"}]));

    let raw = a.compare_with(&b).unwrap().to_raw();
    assert_eq!(
        raw,
        json!({
            "only_in_a": [{"name": "bash", "version": "4.3"}],
            "only_in_b": [{"name": "bash", "version": "4.4"}]
        })
    );
}

#[test]
fn test_extract_changed_pairs_ignores_unkeyed_elements() {
    let mut a = packages(json!([
        {"version": "1.0"},
        {"name": "bash", "version": "4.3"}
    ]));
    let mut b = packages(json!([
        {"name": "bash", "version": "4.4"},
        {"version": "2.0"}
    ]));

    let pairs = extract_changed_pairs(&mut a, &mut b, "name");
    assert_eq!(pairs.len(), 1);
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
}

#[test]
fn test_extract_changed_pairs_without_shared_keys() {
    let mut a = packages(json!([{"name": "bash", "version": "4.3"}]));
    let mut b = packages(json!([{"name": "zsh", "version": "5.0"}]));

    let pairs = extract_changed_pairs(&mut a, &mut b, "name");
    assert!(pairs.is_empty());
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
}

#[test]
fn test_compare_does_not_mutate_inputs() {
    let a = packages(json!([{"name": "bash", "version": "4.3"}]));
    let b = packages(json!([{"name": "bash", "version": "4.4"}]));
    let a_before = a.clone();
    let b_before = b.clone();

    a.compare_with(&b).unwrap();
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}
