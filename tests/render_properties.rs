//! Behavioural tests for the render pipeline
//!
//! Covers the guarantees callers rely on: validation gates resolution,
//! violations follow declaration order, rendering is pure, and supplied
//! values land where their placeholders were.

use doc_stencil::{
    render, render_with_config, validate, FieldSpec, FieldValue, FieldValues, RenderConfig,
    RenderResult, Schema, UnresolvedMarker, Violation, ViolationKind,
};
use pretty_assertions::assert_eq;

fn status_schema() -> Schema {
    Schema::new(
        vec![FieldSpec::enumeration("status", ["draft", "review", "published"]).required()],
        "Status: {{status}}",
    )
    .expect("Should build")
}

fn record_schema() -> Schema {
    Schema::new(
        vec![
            FieldSpec::string("title").required(),
            FieldSpec::number("id").required(),
            FieldSpec::enumeration("status", ["draft", "review", "published"]),
            FieldSpec::boolean("public").with_default(false),
            FieldSpec::list("tags"),
            FieldSpec::date("decided"),
            FieldSpec::string("owner"),
        ],
        "# {{id}} {{title}}\nstatus={{status}} public={{public}}\ntags={{tags}}\ndecided={{decided}}\nowner={{owner}}\n",
    )
    .expect("Should build")
}

fn kinds(violations: &[Violation]) -> Vec<(&str, ViolationKind)> {
    violations
        .iter()
        .map(|v| (v.field.as_str(), v.kind))
        .collect()
}

#[test]
fn test_scenario_enum_value_renders() {
    let result = render(&status_schema(), &FieldValues::new().with("status", "review"));
    assert_eq!(
        result,
        RenderResult::Rendered {
            document: "Status: review".to_string()
        }
    );
}

#[test]
fn test_scenario_missing_required_enum_rejected() {
    let result = render(&status_schema(), &FieldValues::new());
    assert_eq!(
        kinds(result.violations()),
        vec![("status", ViolationKind::MissingRequired)]
    );
    assert_eq!(result.document(), None);
}

#[test]
fn test_scenario_optional_field_gets_marker() {
    let schema = Schema::new(vec![FieldSpec::string("owner")], "Owner: {{owner}}")
        .expect("Should build");
    assert!(validate(&schema, &FieldValues::new()).is_empty());
    assert_eq!(
        render(&schema, &FieldValues::new()),
        RenderResult::Rendered {
            document: "Owner: [owner]".to_string()
        }
    );
}

#[test]
fn test_scenario_unreferenced_number_field() {
    let schema = Schema::new(vec![FieldSpec::number("id").required()], "Nothing to fill")
        .expect("unused declared fields are legal");
    let result = render(&schema, &FieldValues::new().with("id", "abc"));
    assert_eq!(kinds(result.violations()), vec![("id", ViolationKind::TypeMismatch)]);
}

#[test]
fn test_valid_values_never_rejected() {
    let schema = record_schema();
    let value_sets = vec![
        FieldValues::new().with("title", "A").with("id", "1"),
        FieldValues::new()
            .with("title", "B")
            .with("id", 2i64)
            .with("status", "published")
            .with("public", "true")
            .with("tags", FieldValue::list(["x", "y"]))
            .with("decided", "2023-12-31")
            .with("owner", "platform"),
        FieldValues::new()
            .with("title", "C")
            .with("id", "-0.5")
            .with("tags", FieldValue::List(vec![])),
    ];

    for values in &value_sets {
        assert!(validate(&schema, values).is_empty());
        assert!(render(&schema, values).is_rendered());
    }
}

#[test]
fn test_rendering_is_byte_identical_across_calls() {
    let schema = record_schema();
    let values = FieldValues::new()
        .with("title", "Retry policy")
        .with("id", 9i64)
        .with("tags", FieldValue::list(["net", "resilience"]));

    let first = render(&schema, &values);
    for _ in 0..5 {
        assert_eq!(render(&schema, &values), first);
    }
}

#[test]
fn test_missing_required_fields_follow_declaration_order() {
    let schema = Schema::new(
        vec![
            FieldSpec::string("c").required(),
            FieldSpec::string("a").required(),
            FieldSpec::string("optional"),
            FieldSpec::string("b").required(),
        ],
        "",
    )
    .expect("Should build");

    let violations = validate(&schema, &FieldValues::new().with("optional", "x"));
    assert_eq!(
        kinds(&violations),
        vec![
            ("c", ViolationKind::MissingRequired),
            ("a", ViolationKind::MissingRequired),
            ("b", ViolationKind::MissingRequired),
        ]
    );
}

#[test]
fn test_every_problem_reported_in_one_pass() {
    let schema = record_schema();
    let values = FieldValues::new()
        .with("decided", "31/12/2023")
        .with("tags", "single")
        .with("status", "Draft")
        .with("id", "twelve");

    assert_eq!(
        kinds(&validate(&schema, &values)),
        vec![
            ("title", ViolationKind::MissingRequired),
            ("id", ViolationKind::TypeMismatch),
            ("status", ViolationKind::InvalidEnumValue),
            ("tags", ViolationKind::TypeMismatch),
            ("decided", ViolationKind::InvalidDateFormat),
        ]
    );
}

#[test]
fn test_supplied_values_replace_their_placeholders() {
    let schema = record_schema();
    let values = FieldValues::new()
        .with("title", "Cache layout")
        .with("id", "17")
        .with("status", "draft")
        .with("public", true)
        .with("tags", FieldValue::list(["cache", "storage"]))
        .with("decided", "2024-06-30")
        .with("owner", "storage-team");

    let document = render(&schema, &values)
        .into_result()
        .expect("Should render");

    assert_eq!(
        document,
        "# 17 Cache layout\nstatus=draft public=true\ntags=cache, storage\ndecided=2024-06-30\nowner=storage-team\n"
    );
    for name in schema.placeholders() {
        assert!(
            !document.contains(&format!("{{{{{}}}}}", name)),
            "placeholder for {} left in output",
            name
        );
    }
}

#[test]
fn test_defaults_and_markers_fill_the_gaps() {
    let document = render(
        &record_schema(),
        &FieldValues::new().with("title", "T").with("id", 1i64),
    )
    .into_result()
    .expect("Should render");

    assert_eq!(
        document,
        "# 1 T\nstatus=[status] public=false\ntags=[tags]\ndecided=[decided]\nowner=[owner]\n"
    );
}

#[test]
fn test_enum_boundary() {
    let schema = status_schema();
    // Last allowed value
    assert!(render(&schema, &FieldValues::new().with("status", "published")).is_rendered());
    // Same letters, different case
    let result = render(&schema, &FieldValues::new().with("status", "PUBLISHED"));
    assert_eq!(
        kinds(result.violations()),
        vec![("status", ViolationKind::InvalidEnumValue)]
    );
}

#[test]
fn test_substituted_values_are_not_rescanned() {
    let schema = Schema::new(
        vec![FieldSpec::string("a"), FieldSpec::string("b")],
        "{{a}} / {{b}}",
    )
    .expect("Should build");
    let values = FieldValues::new().with("a", "{{b}}");
    assert_eq!(
        render(&schema, &values).document(),
        Some("{{b}} / [b]")
    );
}

#[test]
fn test_custom_marker_policy() {
    let schema = Schema::new(vec![FieldSpec::string("owner")], "Owner: {{owner}}")
        .expect("Should build");
    let config = RenderConfig::new().with_marker(UnresolvedMarker::Custom("<TODO {name}>".into()));
    assert_eq!(
        render_with_config(&schema, &FieldValues::new(), &config).document(),
        Some("Owner: <TODO owner>")
    );
}

#[test]
fn test_undeclared_values_are_ignored() {
    let result = render(
        &status_schema(),
        &FieldValues::new().with("status", "draft").with("colour", "red"),
    );
    assert_eq!(result.document(), Some("Status: draft"));
}

#[test]
fn test_concurrent_renders_share_inputs() {
    let schema = record_schema();
    let values = FieldValues::new().with("title", "Parallel").with("id", 3i64);
    let expected = render(&schema, &values);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| render(&schema, &values)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread panicked"), expected);
        }
    });
}
