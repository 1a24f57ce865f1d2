//! The builtin feature-function catalog.
//!
//! Each constructor closes over the definition's literal fields (`value`,
//! `data_type`, `args`) at construction time; the returned functions are
//! pure over `(example, event_sequence)`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Datelike;

use cdm_model::{DataType, Example, EventSequence, FeatureDefinition, Key, Scalar};

use crate::args::{arg_index, arg_str, optional_arg, require_arg};
use crate::error::{FeatureError, Result};
use crate::registry::{Extractor, FeatureFn, Namespace, Resolver};

/// The namespace holding every builtin constructor, function, and
/// extractor. Consulted first by convention.
pub fn builtin_namespace() -> Namespace {
    let mut ns = Namespace::new();
    ns.register_constructor("example_field", mk_example_field);
    ns.register_constructor("year_of_fact", mk_year_of_fact);
    ns.register_constructor("fact_matches", mk_fact_matches);
    ns.register_constructor("has_event", mk_has_event);
    ns.register_constructor("count_events", mk_count_events);
    ns.register_constructor("proportion_events", mk_proportion_events);
    ns.register_constructor("count_events_matching", mk_count_events_matching);
    ns.register_constructor("proportion_events_matching", mk_proportion_events_matching);
    ns.register_function(
        "event_sequence_id",
        Arc::new(|_: &Example, seq: &EventSequence| Ok(Scalar::Int(seq.id()))),
    );
    ns.register_function(
        "n_events",
        Arc::new(|_: &Example, seq: &EventSequence| Ok(Scalar::Int(seq.n_events() as i64))),
    );
    ns.register_extractor(
        "value",
        Arc::new(|event| event.value().map(str::to_string)),
    );
    ns
}

fn declared_type(def: &FeatureDefinition) -> Result<DataType> {
    Ok(DataType::from_name(def.data_type.as_deref().unwrap_or(""))?)
}

/// Split the definition's literal value into the match set. An absent
/// value yields the empty set (matching nothing).
fn value_set(def: &FeatureDefinition, delimiter: &str) -> HashSet<String> {
    match &def.value {
        Some(value) => value.split(delimiter).map(str::to_string).collect(),
        None => HashSet::new(),
    }
}

/// Returns the example's field at the required index, cast to the
/// declared data type.
fn mk_example_field(def: &FeatureDefinition, _: &Resolver<'_>) -> Result<FeatureFn> {
    let data_type = declared_type(def)?;
    let arg = require_arg(&def.args, 0, "field_index")?;
    let index = arg_index(arg).ok_or_else(|| FeatureError::BadArguments(arg.clone()))?;
    Ok(Arc::new(move |example, _| {
        let field = example
            .field(index)
            .ok_or(FeatureError::UnknownField(index))?;
        Ok(data_type.cast(field)?)
    }))
}

/// Parses the fact at this key as a date and returns its year; the
/// type's zero value when the fact is absent.
fn mk_year_of_fact(def: &FeatureDefinition, _: &Resolver<'_>) -> Result<FeatureFn> {
    let data_type = declared_type(def)?;
    let key = def.key();
    let arg = require_arg(&def.args, 0, "date_format")?;
    let format = arg_str(arg)
        .ok_or_else(|| FeatureError::BadArguments(arg.clone()))?
        .to_string();
    Ok(Arc::new(move |_, seq| match seq.fact(&key) {
        None => Ok(data_type.zero()),
        Some(text) => Ok(data_type.of_i64(i64::from(parse_year(text, &format)?))),
    }))
}

fn parse_year(text: &str, format: &str) -> Result<i32> {
    if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(text, format) {
        return Ok(datetime.year());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(text, format) {
        return Ok(date.year());
    }
    Err(FeatureError::DateParse {
        value: text.to_string(),
        format: format.to_string(),
    })
}

/// Whether the fact at this key is a member of the delimiter-split value
/// set, cast to the declared type. The optional argument is the
/// delimiter (default `,`).
fn mk_fact_matches(def: &FeatureDefinition, _: &Resolver<'_>) -> Result<FeatureFn> {
    let data_type = declared_type(def)?;
    let key = def.key();
    let delimiter = optional_arg(&def.args, 0, "delimiter", true)?
        .and_then(arg_str)
        .unwrap_or(",");
    let values = value_set(def, delimiter);
    Ok(Arc::new(move |_, seq| {
        let matched = seq.fact(&key).is_some_and(|value| values.contains(value));
        Ok(data_type.of_bool(matched))
    }))
}

/// Whether the sequence contains any event of this key.
fn mk_has_event(def: &FeatureDefinition, _: &Resolver<'_>) -> Result<FeatureFn> {
    let data_type = declared_type(def)?;
    let key = def.key();
    Ok(Arc::new(move |_, seq| {
        Ok(data_type.of_bool(seq.has_type(&key)))
    }))
}

/// How many events of this key the sequence contains.
fn mk_count_events(def: &FeatureDefinition, _: &Resolver<'_>) -> Result<FeatureFn> {
    let data_type = declared_type(def)?;
    let key = def.key();
    Ok(Arc::new(move |_, seq| {
        Ok(data_type.of_i64(seq.n_events_of_type(&key) as i64))
    }))
}

/// `count_events / n_events`, zero on an empty sequence.
fn mk_proportion_events(def: &FeatureDefinition, _: &Resolver<'_>) -> Result<FeatureFn> {
    let data_type = declared_type(def)?;
    let key = def.key();
    Ok(Arc::new(move |_, seq| {
        Ok(data_type.of_f64(ratio(seq.n_events_of_type(&key), seq.n_events())))
    }))
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Shared setup for the `*_events_matching` pair: the match set and the
/// (possibly named) comparison-value extractor.
fn matching_parts(
    def: &FeatureDefinition,
    resolver: &Resolver<'_>,
) -> Result<(Key, HashSet<String>, Extractor)> {
    let delimiter = optional_arg(&def.args, 0, "delimiter", true)?
        .and_then(arg_str)
        .unwrap_or(",");
    let values = value_set(def, delimiter);
    let extractor_name = optional_arg(&def.args, 1, "extractor", false)?
        .and_then(arg_str)
        .unwrap_or("value");
    let extractor = resolver
        .extractor(extractor_name)
        .ok_or_else(|| FeatureError::UnknownExtractor(extractor_name.to_string()))?;
    Ok((def.key(), values, extractor))
}

fn count_matching(
    seq: &EventSequence,
    key: &Key,
    values: &HashSet<String>,
    extractor: &Extractor,
) -> usize {
    seq.events_of_type(key)
        .filter(|event| extractor(event).is_some_and(|value| values.contains(&value)))
        .count()
}

/// Counts events of this key whose extracted comparison value is in the
/// delimiter-split value set.
fn mk_count_events_matching(def: &FeatureDefinition, resolver: &Resolver<'_>) -> Result<FeatureFn> {
    let data_type = declared_type(def)?;
    let (key, values, extractor) = matching_parts(def, resolver)?;
    Ok(Arc::new(move |_, seq| {
        Ok(data_type.of_i64(count_matching(seq, &key, &values, &extractor) as i64))
    }))
}

/// The matching count as a proportion of all events, zero on an empty
/// sequence.
fn mk_proportion_events_matching(
    def: &FeatureDefinition,
    resolver: &Resolver<'_>,
) -> Result<FeatureFn> {
    let data_type = declared_type(def)?;
    let (key, values, extractor) = matching_parts(def, resolver)?;
    Ok(Arc::new(move |_, seq| {
        let count = count_matching(seq, &key, &values, &extractor);
        Ok(data_type.of_f64(ratio(count, seq.n_events())))
    }))
}
