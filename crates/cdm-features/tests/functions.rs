//! Tests for feature-function resolution and the builtin catalog.

use std::sync::Arc;

use serde_json::{Value, json};

use cdm_features::{FeatureError, FeatureFn, Namespace, Resolver, builtin_namespace};
use cdm_model::{Event, Example, EventSequence, FeatureDefinition, Interval, Key, Scalar};

fn ev(cat: &str, typ: &str, val: Option<&str>) -> Event {
    Event::new(
        Interval::new(1.0, 2.0),
        Key::new(cat, typ),
        val.map(str::to_string),
        None,
    )
}

fn fixture_sequence() -> EventSequence {
    EventSequence::new(
        808_186_755,
        vec![
            ev("mx", "4", Some("lo")),
            ev("mx", "4", Some("hi")),
            ev("mx", "5", Some("lo")),
            ev("mx", "8", Some("hi")),
            ev("mx", "0", Some("lo")),
            ev("mx", "2", Some("ok")),
            ev("mx", "1", Some("ok")),
            ev("mx", "8", Some("ok")),
            ev("dx", "2", None),
            ev("dx", "0", None),
            ev("dx", "7", None),
            ev("dx", "2", None),
            ev("dx", "1", None),
            ev("dx", "3", None),
            ev("rx", "0", None),
            ev("rx", "5", None),
            ev("rx", "0", None),
            ev("rx", "4", None),
            ev("rx", "1", None),
            ev("px", "3", None),
            ev("px", "2", None),
            ev("px", "5", None),
            ev("px", "2", None),
            ev("ox", "0", None),
            ev("ox", "6", None),
            ev("vx", "1", None),
            ev("vx", "1", None),
            ev("xx", "", None),
        ],
        vec![
            (Key::new("bx", "dob"), Some("1949-04-09".to_string())),
            (Key::new("bx", "ethn"), Some("1".to_string())),
            (Key::new("bx", "gndr"), Some("M".to_string())),
            (Key::new("bx", "race"), Some("2".to_string())),
            (Key::new("hx", "cancer-father"), Some("yes".to_string())),
            (Key::new("hx", "cancer-mother"), Some("no".to_string())),
        ],
    )
}

fn example() -> Example {
    Example {
        id: 647_096_516,
        lo: Some(100.0),
        hi: Some(281.0),
        label: Some("+".to_string()),
        treatment: Some("c".to_string()),
        class: Some("0".to_string()),
        weight: Some(0.511_115_423_882_739_1),
        n_events: Some(13),
        json: None,
    }
}

fn def(
    id: i64,
    table: &str,
    typ: &str,
    value: Option<&str>,
    data_type: Option<&str>,
    function: &str,
    args: Value,
) -> FeatureDefinition {
    FeatureDefinition {
        id,
        name: format!("{table}-{typ}"),
        table: table.to_string(),
        typ: typ.to_string(),
        value: value.map(str::to_string),
        data_type: data_type.map(str::to_string),
        function: function.to_string(),
        args,
    }
}

fn resolve(definition: &FeatureDefinition) -> FeatureFn {
    let builtins = builtin_namespace();
    let resolver = Resolver::new(vec![&builtins]);
    resolver.resolve(definition).expect("resolve builtin")
}

fn apply(definition: &FeatureDefinition) -> Scalar {
    resolve(definition)(&example(), &fixture_sequence()).expect("apply feature")
}

#[test]
fn event_sequence_id_is_a_bare_function() {
    let d = def(67420, "_attr", "id", None, None, "event_sequence_id", Value::Null);
    assert_eq!(apply(&d), Scalar::Int(808_186_755));
}

#[test]
fn example_field_casts_the_indexed_field() {
    let d = def(25721, "_attr", "wgt", None, Some("float"), "example_field", json!(6));
    assert_eq!(apply(&d), Scalar::Float(0.511_115_423_882_739_1));
}

#[test]
fn example_field_by_map_key() {
    let d = def(
        25722,
        "_attr",
        "id",
        None,
        Some("int"),
        "example_field",
        json!({"field_index": 0}),
    );
    assert_eq!(apply(&d), Scalar::Int(647_096_516));
}

#[test]
fn year_of_fact_parses_the_fact_date() {
    let d = def(
        94400,
        "bx",
        "dob",
        None,
        Some("int"),
        "year_of_fact",
        json!("%Y-%m-%d"),
    );
    assert_eq!(apply(&d), Scalar::Int(1949));
}

#[test]
fn year_of_fact_is_zero_when_the_fact_is_absent() {
    let d = def(
        50096,
        "bx",
        "yob",
        None,
        Some("int"),
        "year_of_fact",
        json!("%Y-%m-%d"),
    );
    assert_eq!(apply(&d), Scalar::Int(0));
}

#[test]
fn year_of_fact_rejects_unparseable_dates() {
    let d = def(
        50097,
        "bx",
        "ethn",
        None,
        Some("int"),
        "year_of_fact",
        json!("%Y-%m-%d"),
    );
    let err = resolve(&d)(&example(), &fixture_sequence()).expect_err("bad date");
    assert!(matches!(err, FeatureError::DateParse { .. }));
}

#[test]
fn fact_matches_splits_the_value_set() {
    let cases = [
        (16664, Some("F"), None, 0),
        (54547, Some("M"), None, 1),
        (61122, Some("F,M,O,U"), None, 1),
        (48965, Some("F-M"), Some("-"), 1),
    ];
    for (id, value, delimiter, expected) in cases {
        let args = delimiter.map_or(Value::Null, |d| json!(d));
        let d = def(id, "bx", "gndr", value, Some("int"), "fact_matches", args);
        assert_eq!(apply(&d), Scalar::Int(expected), "feature {id}");
    }
}

#[test]
fn fact_matches_without_a_value_matches_nothing() {
    let d = def(1, "bx", "gndr", None, Some("int"), "fact_matches", Value::Null);
    assert_eq!(apply(&d), Scalar::Int(0));
}

#[test]
fn has_event() {
    let cases = [
        (92760, "dx", "1", 1),
        (98707, "px", "2", 1),
        (30099, "rx", "3", 0),
        (38896, "vx", "4", 0),
    ];
    for (id, table, typ, expected) in cases {
        let d = def(id, table, typ, None, Some("int"), "has_event", Value::Null);
        assert_eq!(apply(&d), Scalar::Int(expected), "feature {id}");
    }
}

#[test]
fn count_events() {
    let cases = [
        (92760, "dx", "1", 1),
        (98707, "px", "2", 2),
        (30099, "rx", "3", 0),
        (38896, "vx", "4", 0),
    ];
    for (id, table, typ, expected) in cases {
        let d = def(id, table, typ, None, Some("int"), "count_events", Value::Null);
        assert_eq!(apply(&d), Scalar::Int(expected), "feature {id}");
    }
}

#[test]
fn n_events_counts_the_whole_sequence() {
    let d = def(11111, "_attr", "n", None, None, "n_events", Value::Null);
    assert_eq!(apply(&d), Scalar::Int(28));
}

#[test]
fn proportion_events() {
    let d = def(
        22222,
        "px",
        "2",
        None,
        Some("float"),
        "proportion_events",
        Value::Null,
    );
    assert_eq!(apply(&d), Scalar::Float(2.0 / 28.0));
}

#[test]
fn proportion_events_is_zero_on_an_empty_sequence() {
    let d = def(
        22223,
        "px",
        "2",
        None,
        Some("float"),
        "proportion_events",
        Value::Null,
    );
    let empty = EventSequence::new(1, vec![], vec![]);
    let value = resolve(&d)(&example(), &empty).expect("apply on empty");
    assert_eq!(value, Scalar::Float(0.0));
}

#[test]
fn count_events_matching_uses_the_value_set() {
    let d = def(
        33333,
        "mx",
        "4",
        Some("lo,hi"),
        Some("int"),
        "count_events_matching",
        Value::Null,
    );
    assert_eq!(apply(&d), Scalar::Int(2));

    let d = def(
        33334,
        "mx",
        "4",
        Some("lo"),
        Some("int"),
        "count_events_matching",
        Value::Null,
    );
    assert_eq!(apply(&d), Scalar::Int(1));
}

#[test]
fn count_events_matching_with_custom_delimiter() {
    let d = def(
        33335,
        "mx",
        "4",
        Some("lo;hi"),
        Some("int"),
        "count_events_matching",
        json!({"delimiter": ";"}),
    );
    assert_eq!(apply(&d), Scalar::Int(2));
}

#[test]
fn count_events_matching_rejects_unknown_extractors() {
    let d = def(
        33336,
        "mx",
        "4",
        Some("lo"),
        Some("int"),
        "count_events_matching",
        json!({"extractor": "dose"}),
    );
    let builtins = builtin_namespace();
    let resolver = Resolver::new(vec![&builtins]);
    let err = resolver.resolve(&d).expect_err("unknown extractor");
    assert!(matches!(err, FeatureError::UnknownExtractor(name) if name == "dose"));
}

#[test]
fn proportion_events_matching() {
    let d = def(
        44444,
        "mx",
        "4",
        Some("lo"),
        Some("float"),
        "proportion_events_matching",
        Value::Null,
    );
    assert_eq!(apply(&d), Scalar::Float(1.0 / 28.0));
}

#[test]
fn unknown_function_reports_id_and_name() {
    let d = def(99999, "bx", "x", None, None, "no_such_function", Value::Null);
    let builtins = builtin_namespace();
    let resolver = Resolver::new(vec![&builtins]);
    let err = resolver.resolve(&d).expect_err("unknown function");
    let message = err.to_string();
    assert!(message.contains("99999"), "got: {message}");
    assert!(message.contains("no_such_function"), "got: {message}");
}

#[test]
fn lambda_definitions_are_a_configuration_error() {
    let d = def(88888, "bx", "x", None, None, "lambda ex, seq: 1", Value::Null);
    let builtins = builtin_namespace();
    let resolver = Resolver::new(vec![&builtins]);
    assert!(matches!(
        resolver.resolve(&d).expect_err("lambda"),
        FeatureError::LambdaUnsupported { id: 88888 }
    ));
}

#[test]
fn empty_args_list_is_malformed() {
    let d = def(77777, "_attr", "wgt", None, Some("float"), "example_field", json!([]));
    let builtins = builtin_namespace();
    let resolver = Resolver::new(vec![&builtins]);
    assert!(matches!(
        resolver.resolve(&d).expect_err("empty args"),
        FeatureError::BadArguments(_)
    ));
}

fn mk_const_one(
    _: &FeatureDefinition,
    _: &Resolver<'_>,
) -> Result<FeatureFn, FeatureError> {
    Ok(Arc::new(|_: &Example, _: &EventSequence| Ok(Scalar::Int(1))))
}

#[test]
fn extension_namespaces_are_consulted_after_builtins() {
    let mut extension = Namespace::new();
    extension.register_constructor("const_one", mk_const_one);
    extension.register_function(
        "answer",
        Arc::new(|_: &Example, _: &EventSequence| Ok(Scalar::Int(42))),
    );

    let builtins = builtin_namespace();
    let resolver = Resolver::new(vec![&builtins, &extension]);

    let d = def(1, "a", "b", None, None, "const_one", Value::Null);
    let f = resolver.resolve(&d).expect("extension constructor");
    assert_eq!(f(&example(), &fixture_sequence()).unwrap(), Scalar::Int(1));

    let d = def(2, "a", "b", None, None, "answer", Value::Null);
    let f = resolver.resolve(&d).expect("extension bare function");
    assert_eq!(f(&example(), &fixture_sequence()).unwrap(), Scalar::Int(42));
}
