//! Typed parsers for the three table layouts.
//!
//! Every field is nullable at the text level: an empty field parses to
//! `None`. Parsers report the table line and field name on failure;
//! downstream components never re-validate records.

use std::io::Read;

use csv::{Reader, StringRecord};

use cdm_model::{Example, EventRecord, FeatureDefinition};

use crate::error::{IngestError, Result};

const EVENT_FIELDS: usize = 7;
const EXAMPLE_FIELDS: usize = 9;
const FEATURE_FIELDS: usize = 8;

fn record_line(record: &StringRecord) -> u64 {
    record.position().map_or(0, |pos| pos.line())
}

fn check_len(record: &StringRecord, expected: usize) -> Result<()> {
    if record.len() < expected {
        return Err(IngestError::Field {
            line: record_line(record),
            field: "record",
            message: format!("expected {expected} fields, got {}", record.len()),
        });
    }
    Ok(())
}

fn opt_str(record: &StringRecord, index: usize) -> Option<String> {
    match record.get(index) {
        Some("") | None => None,
        Some(text) => Some(text.to_string()),
    }
}

fn opt_f64(record: &StringRecord, index: usize, field: &'static str) -> Result<Option<f64>> {
    match record.get(index) {
        Some("") | None => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|err| IngestError::Field {
                line: record_line(record),
                field,
                message: format!("{err}: {text:?}"),
            }),
    }
}

fn opt_i64(record: &StringRecord, index: usize, field: &'static str) -> Result<Option<i64>> {
    match record.get(index) {
        Some("") | None => Ok(None),
        Some(text) => text
            .parse::<i64>()
            .map(Some)
            .map_err(|err| IngestError::Field {
                line: record_line(record),
                field,
                message: format!("{err}: {text:?}"),
            }),
    }
}

fn req_i64(record: &StringRecord, index: usize, field: &'static str) -> Result<i64> {
    opt_i64(record, index, field)?.ok_or_else(|| IngestError::Field {
        line: record_line(record),
        field,
        message: "missing required value".to_string(),
    })
}

/// Parse text as JSON, fall back to a bare string scalar when it is not
/// valid JSON, and to `Null` when empty.
pub fn try_parse_json(text: &str) -> serde_json::Value {
    if text.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

/// Parse one event-table row: `id | lo | hi | cat | typ | val | jsn`.
pub fn parse_event_record(record: &StringRecord) -> Result<EventRecord> {
    check_len(record, EVENT_FIELDS)?;
    Ok(EventRecord {
        id: opt_i64(record, 0, "id")?,
        lo: opt_f64(record, 1, "lo")?,
        hi: opt_f64(record, 2, "hi")?,
        cat: opt_str(record, 3),
        typ: opt_str(record, 4),
        val: opt_str(record, 5),
        jsn: opt_str(record, 6),
    })
}

/// Parse one example-table row:
/// `id | lo | hi | lbl | trt | cls | wgt | n_evs | jsn`.
pub fn parse_example(record: &StringRecord) -> Result<Example> {
    check_len(record, EXAMPLE_FIELDS)?;
    Ok(Example {
        id: req_i64(record, 0, "id")?,
        lo: opt_f64(record, 1, "lo")?,
        hi: opt_f64(record, 2, "hi")?,
        label: opt_str(record, 3),
        treatment: opt_str(record, 4),
        class: opt_str(record, 5),
        weight: opt_f64(record, 6, "wgt")?,
        n_events: opt_i64(record, 7, "n_evs")?,
        json: opt_str(record, 8),
    })
}

/// Parse one feature-table row:
/// `id | name | tbl | typ | val | data_type | feat_func | args`.
///
/// The trailing `args` field may be omitted entirely.
pub fn parse_feature_definition(record: &StringRecord) -> Result<FeatureDefinition> {
    check_len(record, FEATURE_FIELDS - 1)?;
    Ok(FeatureDefinition {
        id: req_i64(record, 0, "id")?,
        name: record.get(1).unwrap_or_default().to_string(),
        table: record.get(2).unwrap_or_default().to_string(),
        typ: record.get(3).unwrap_or_default().to_string(),
        value: opt_str(record, 4),
        data_type: opt_str(record, 5),
        function: record.get(6).unwrap_or_default().to_string(),
        args: try_parse_json(record.get(7).unwrap_or_default()),
    })
}

/// Lazy iterator of typed event records.
pub struct EventRecords<R: Read> {
    inner: csv::StringRecordsIntoIter<R>,
}

impl<R: Read> Iterator for EventRecords<R> {
    type Item = Result<EventRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.inner.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err.into())),
        };
        Some(parse_event_record(&record))
    }
}

/// Stream typed event records from a pipe-format reader.
pub fn read_event_records<R: Read>(reader: Reader<R>) -> EventRecords<R> {
    EventRecords {
        inner: reader.into_records(),
    }
}

/// Read a whole example table.
pub fn read_examples<R: Read>(mut reader: Reader<R>) -> Result<Vec<Example>> {
    let mut examples = Vec::new();
    for record in reader.records() {
        examples.push(parse_example(&record?)?);
    }
    tracing::debug!(n_examples = examples.len(), "read example table");
    Ok(examples)
}

/// Read a whole feature-definition table, preserving row order.
pub fn read_feature_definitions<R: Read>(mut reader: Reader<R>) -> Result<Vec<FeatureDefinition>> {
    let mut definitions = Vec::new();
    for record in reader.records() {
        definitions.push(parse_feature_definition(&record?)?);
    }
    tracing::debug!(n_features = definitions.len(), "read feature table");
    Ok(definitions)
}
