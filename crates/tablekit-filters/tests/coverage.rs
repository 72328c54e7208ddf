//! Scenario tests across registry loading, normalization and merging.

use std::io::Write;

use tablekit_filters::{
    merge, normalize, normalize_with_diagnostics, DropReason, FilterDefinition, FilterError,
    FilterMode, FilterRegistry, FilterType, Operator, QuickFilterValues, ServerTableFilter,
};

// ============================================================================
// Registry files
// ============================================================================

const REGISTRY_YAML: &str = r#"
projects:
  - columnKey: status
    label: Status
    filterType: select
    staticOptions:
      - { value: active, label: Active }
      - { value: paused, label: Paused }
  - columnKey: owner
    label: Owner
    filterType: autocomplete
    searchEndpoint: /api/users/search
    resolveEndpoint: /api/users/resolve
  - columnKey: created
    label: Created
    filterType: daterange
crm.contacts:
  - columnKey: email
    label: Email
    filterType: string
"#;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn registry_loads_from_yaml_file() {
    let file = write_temp(".yaml", REGISTRY_YAML);
    let registry = FilterRegistry::from_path(file.path()).unwrap();
    assert!(registry.has_filters("projects"));
    assert!(registry.has_filters("crm.contacts"));
    assert_eq!(registry.get_filters("projects").len(), 3);
}

#[test]
fn registry_loads_from_json_file() {
    let file = write_temp(
        ".json",
        r#"{"t": [{"columnKey": "n", "label": "N", "filterType": "number"}]}"#,
    );
    let registry = FilterRegistry::from_path(file.path()).unwrap();
    assert_eq!(
        registry.get_filter("t", "n").map(|d| d.filter_type),
        Some(FilterType::Number)
    );
}

#[test]
fn registry_rejects_unknown_extension() {
    let file = write_temp(".toml", "[t]");
    assert!(matches!(
        FilterRegistry::from_path(file.path()),
        Err(FilterError::UnsupportedExtension(_))
    ));
}

#[test]
fn registry_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    assert!(matches!(
        FilterRegistry::from_path(&missing),
        Err(FilterError::Io { .. })
    ));
}

#[test]
fn registry_rejects_duplicate_columns_in_file() {
    let file = write_temp(
        ".yml",
        "t:\n  - {columnKey: a, label: A, filterType: string}\n  - {columnKey: a, label: B, filterType: string}\n",
    );
    assert!(matches!(
        FilterRegistry::from_path(file.path()),
        Err(FilterError::DuplicateColumn { .. })
    ));
}

// ============================================================================
// Normalization scenarios
// ============================================================================

#[test]
fn unknown_column_is_dropped() {
    let registry = FilterRegistry::builder()
        .filter("t", FilterDefinition::new("status", "Status", FilterType::Select))
        .build()
        .unwrap();
    let values = QuickFilterValues::new().with("status", "x").with("ghost", "y");

    let out = normalize_with_diagnostics(&registry, "t", &values);
    assert_eq!(out.filters, vec![ServerTableFilter::equals("status", "x")]);
    assert_eq!(out.dropped.len(), 1);
    assert_eq!(out.dropped[0].column, "ghost");
    assert_eq!(out.dropped[0].reason, DropReason::UnknownColumn);
}

#[test]
fn empty_range_normalizes_to_nothing() {
    let registry = FilterRegistry::from_yaml(REGISTRY_YAML).unwrap();
    let values = QuickFilterValues::new().with("created", "|");
    assert!(normalize(&registry, "projects", &values).is_empty());
}

#[test]
fn bad_value_does_not_block_other_filters() {
    let registry = FilterRegistry::builder()
        .filter("t", FilterDefinition::new("n", "N", FilterType::Number))
        .filter("t", FilterDefinition::new("s", "S", FilterType::Select))
        .build()
        .unwrap();
    let values = QuickFilterValues::new().with("n", "twelve").with("s", "ok");
    assert_eq!(
        normalize(&registry, "t", &values),
        vec![ServerTableFilter::equals("s", "ok")]
    );
}

#[test]
fn quick_filters_from_json_payload() {
    let registry = FilterRegistry::from_yaml(REGISTRY_YAML).unwrap();
    let values: QuickFilterValues = serde_json::from_str(
        r#"{"created": "2024-01-01|2024-06-30", "status": ["active", "paused"], "owner": "u-9"}"#,
    )
    .unwrap();

    let filters = normalize(&registry, "projects", &values);
    let summary: Vec<(&str, Operator)> = filters
        .iter()
        .map(|f| (f.field.as_str(), f.operator))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("status", Operator::In),
            ("owner", Operator::Equals),
            ("created", Operator::DateBetween),
        ]
    );
}

// ============================================================================
// Merge scenarios
// ============================================================================

#[test]
fn merged_payload_serializes_for_the_server() {
    let registry = FilterRegistry::from_yaml(REGISTRY_YAML).unwrap();
    let quick = normalize(
        &registry,
        "projects",
        &QuickFilterValues::new().with("status", "active"),
    );
    let view = vec![ServerTableFilter::equals("owner", "bob")];
    let merged = merge(&view, FilterMode::default(), &quick);

    assert_eq!(
        serde_json::to_value(&merged).unwrap(),
        serde_json::json!({
            "filters": [
                {"field": "owner", "operator": "equals", "value": "bob"},
                {"field": "status", "operator": "equals", "value": "active"}
            ],
            "filterMode": "all"
        })
    );
}

#[test]
fn any_mode_ors_quick_filters() {
    let view = vec![
        ServerTableFilter::equals("status", "active"),
        ServerTableFilter::equals("status", "paused"),
    ];
    let quick = vec![ServerTableFilter::equals("owner", "bob")];
    let merged = merge(&view, FilterMode::Any, &quick);
    assert_eq!(merged.filter_mode, FilterMode::Any);
    assert_eq!(merged.filters.len(), 3);
}
