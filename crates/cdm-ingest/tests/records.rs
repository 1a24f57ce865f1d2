//! Tests for the pipe-format table parsers.

use cdm_ingest::{
    pipe_reader, read_event_records, read_examples, read_feature_definitions, try_parse_json,
};

#[test]
fn event_rows_parse_with_nulls() {
    let table = "\
808|||bx|dob|1949-04-09|
808|10|12|rx|statin|40|{\"unit\": \"mg\"}
808|15||dx|401||
";
    let records: Vec<_> = read_event_records(pipe_reader(table.as_bytes()))
        .collect::<Result<_, _>>()
        .expect("parse event table");
    assert_eq!(records.len(), 3);

    assert!(records[0].is_fact());
    assert_eq!(records[0].id, Some(808));
    assert_eq!(records[0].val.as_deref(), Some("1949-04-09"));
    assert_eq!(records[0].jsn, None);

    assert!(!records[1].is_fact());
    assert_eq!(records[1].lo, Some(10.0));
    assert_eq!(records[1].hi, Some(12.0));
    assert_eq!(records[1].jsn.as_deref(), Some("{\"unit\": \"mg\"}"));

    // One-sided time is still an event.
    assert!(!records[2].is_fact());
    assert_eq!(records[2].lo, Some(15.0));
    assert_eq!(records[2].hi, None);
}

#[test]
fn quoted_field_keeps_delimiter_and_escaped_quote() {
    let table = "1|2|3|cat|typ|\"a|b\"|\n";
    let records: Vec<_> = read_event_records(pipe_reader(table.as_bytes()))
        .collect::<Result<_, _>>()
        .expect("parse quoted row");
    assert_eq!(records[0].val.as_deref(), Some("a|b"));

    let table = "1|2|3|cat|typ|\"say \\\"hi\\\"\"|\n";
    let records: Vec<_> = read_event_records(pipe_reader(table.as_bytes()))
        .collect::<Result<_, _>>()
        .expect("parse escaped quote");
    assert_eq!(records[0].val.as_deref(), Some("say \"hi\""));
}

#[test]
fn bad_time_reports_line_and_field() {
    let table = "808|ten|12|rx|statin||\n";
    let err = read_event_records(pipe_reader(table.as_bytes()))
        .next()
        .expect("one row")
        .expect_err("bad lo field");
    let message = err.to_string();
    assert!(message.contains("line 1"), "got: {message}");
    assert!(message.contains("lo"), "got: {message}");
}

#[test]
fn short_event_row_is_an_error() {
    let table = "808|1|2|rx\n";
    let err = read_event_records(pipe_reader(table.as_bytes()))
        .next()
        .expect("one row")
        .expect_err("short row");
    assert!(err.to_string().contains("expected 7 fields"));
}

#[test]
fn example_rows_parse() {
    let table = "123456789|100|281|rx-A:dx-X|c|+|267.0|13|{\"age\": 50}\n";
    let examples = read_examples(pipe_reader(table.as_bytes())).expect("parse example table");
    assert_eq!(examples.len(), 1);
    let ex = &examples[0];
    assert_eq!(ex.id, 123_456_789);
    assert_eq!(ex.lo, Some(100.0));
    assert_eq!(ex.label.as_deref(), Some("rx-A:dx-X"));
    assert_eq!(ex.treatment.as_deref(), Some("c"));
    assert_eq!(ex.class.as_deref(), Some("+"));
    assert_eq!(ex.weight, Some(267.0));
    assert_eq!(ex.n_events, Some(13));
}

#[test]
fn feature_rows_parse_args_as_json_or_scalar() {
    let table = "\
94400|bx-dob|bx|dob||int|year_of_fact|\"%Y-%m-%d\"
25721|_attr-wgt|_attr|wgt||float|example_field|6
48965|bx-gndr-fm|bx|gndr|F-M|int|fact_matches|-
67420|_attr-id|_attr|id|||event_sequence_id|
";
    let defs =
        read_feature_definitions(pipe_reader(table.as_bytes())).expect("parse feature table");
    assert_eq!(defs.len(), 4);

    assert_eq!(defs[0].id, 94400);
    assert_eq!(defs[0].function, "year_of_fact");
    assert_eq!(defs[0].args, serde_json::json!("%Y-%m-%d"));

    assert_eq!(defs[1].args, serde_json::json!(6));

    // Bare text that is not valid JSON stays a string scalar.
    assert_eq!(defs[2].args, serde_json::json!("-"));

    assert_eq!(defs[3].data_type, None);
    assert_eq!(defs[3].args, serde_json::Value::Null);
}

#[test]
fn try_parse_json_shapes() {
    assert_eq!(try_parse_json(""), serde_json::Value::Null);
    assert_eq!(try_parse_json("3"), serde_json::json!(3));
    assert_eq!(try_parse_json("[1, 2]"), serde_json::json!([1, 2]));
    assert_eq!(
        try_parse_json("{\"delimiter\": \",\"}"),
        serde_json::json!({"delimiter": ","})
    );
    assert_eq!(try_parse_json("%Y-%m-%d"), serde_json::json!("%Y-%m-%d"));
}

#[test]
fn open_pipe_file_reads_from_disk() {
    use std::io::Write as _;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "808|1|2|rx|statin||").expect("write row");
    let reader = cdm_ingest::open_pipe_file(file.path()).expect("open table");
    let records: Vec<_> = read_event_records(reader)
        .collect::<Result<_, _>>()
        .expect("parse file");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].typ.as_deref(), Some("statin"));
}
