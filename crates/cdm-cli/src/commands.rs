//! The `featurize` and `segment` pipelines.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use cdm_events::{PeriodOptions, SequenceOptions, periods, sequences};
use cdm_features::{FeatureIndex, Resolver, builtin_namespace, vector, write_vector};
use cdm_ingest::{
    chunk_by_id, open_pipe_file, read_event_records, read_examples, read_feature_definitions,
};
use cdm_model::{Event, Example, Key};

use crate::cli::{FeaturizeArgs, LabelFieldArg, SegmentArgs};

pub struct FeaturizeResult {
    pub n_examples: usize,
    pub n_sequences: usize,
    pub n_vectors: usize,
}

pub struct SegmentResult {
    pub n_sequences: usize,
    pub n_periods: usize,
}

/// Read the three tables and write one SVMLight line per (example,
/// sequence) pair. Events stream through one subject at a time; only the
/// example and feature tables are held in memory.
pub fn run_featurize(args: &FeaturizeArgs) -> Result<FeaturizeResult> {
    let definitions = read_feature_definitions(
        open_pipe_file(&args.features)
            .with_context(|| format!("open {}", args.features.display()))?,
    )
    .with_context(|| format!("read feature table {}", args.features.display()))?;
    let builtins = builtin_namespace();
    let resolver = Resolver::new(vec![&builtins]);
    let index = FeatureIndex::build(&definitions, &resolver).context("build feature index")?;

    let examples = read_examples(
        open_pipe_file(&args.examples)
            .with_context(|| format!("open {}", args.examples.display()))?,
    )
    .with_context(|| format!("read example table {}", args.examples.display()))?;
    let n_examples = examples.len();
    let mut examples_by_id: HashMap<i64, Vec<Example>> = HashMap::new();
    for example in examples {
        examples_by_id.entry(example.id).or_default().push(example);
    }

    let always_keys = parse_always_keys(&args.always_keys)?;

    let reader = open_pipe_file(&args.events)
        .with_context(|| format!("open {}", args.events.display()))?;
    let stream = sequences(
        chunk_by_id(read_event_records(reader)),
        SequenceOptions::new(),
    );

    let mut out = open_output(args.out.as_deref())?;
    let mut n_sequences = 0usize;
    let mut n_vectors = 0usize;
    for sequence in stream {
        let sequence = sequence.context("read event table")?;
        n_sequences += 1;
        let Some(group) = examples_by_id.get(&sequence.id()) else {
            debug!(id = sequence.id(), "sequence has no examples");
            continue;
        };
        for example in group {
            // Window the sequence to the example's span when it has one.
            let windowed;
            let scoped = match (example.lo, example.hi) {
                (Some(lo), Some(hi)) => {
                    windowed = sequence.subsequence(lo, hi);
                    &windowed
                }
                _ => &sequence,
            };
            let assembled = vector(&index, example, scoped, &always_keys)
                .with_context(|| format!("assemble vector for sequence {}", sequence.id()))?;
            let label = label_of(example, args.label_field, &args.default_label);
            write_vector(&mut out, label, &assembled).context("write vector")?;
            n_vectors += 1;
        }
    }
    out.flush().context("flush output")?;
    info!(n_examples, n_sequences, n_vectors, "featurize complete");
    Ok(FeaturizeResult {
        n_examples,
        n_sequences,
        n_vectors,
    })
}

/// Segment each subject's events into disjoint, gap-filled periods and
/// write them as pipe-delimited `id|lo|hi|value` rows.
pub fn run_segment(args: &SegmentArgs) -> Result<SegmentResult> {
    let mut options = PeriodOptions::new(args.output_zero.clone())
        .min_len(args.min_len)
        .backoff(args.backoff);
    if !args.zero_values.is_empty() {
        options = options.zero_values(args.zero_values.clone());
    }
    if let Some(lo) = args.span_lo {
        options = options.span_lo(lo);
    }
    if let Some(hi) = args.span_hi {
        options = options.span_hi(hi);
    }

    let reader = open_pipe_file(&args.events)
        .with_context(|| format!("open {}", args.events.display()))?;
    let stream = sequences(
        chunk_by_id(read_event_records(reader)),
        SequenceOptions::new(),
    );

    let mut out = open_output(args.out.as_deref())?;
    let mut n_sequences = 0usize;
    let mut n_periods = 0usize;
    for sequence in stream {
        let sequence = sequence.context("read event table")?;
        n_sequences += 1;
        for (interval, value) in periods(sequence.events(), event_value, &options) {
            writeln!(out, "{}|{}|{}|{value}", sequence.id(), interval.lo, interval.hi)
                .context("write period")?;
            n_periods += 1;
        }
    }
    out.flush().context("flush output")?;
    info!(n_sequences, n_periods, "segment complete");
    Ok(SegmentResult {
        n_sequences,
        n_periods,
    })
}

fn event_value(event: &Event) -> String {
    event.value().unwrap_or_default().to_string()
}

fn label_of<'a>(example: &'a Example, field: LabelFieldArg, default: &'a str) -> &'a str {
    let value = match field {
        LabelFieldArg::Label => example.label.as_deref(),
        LabelFieldArg::Treatment => example.treatment.as_deref(),
        LabelFieldArg::Class => example.class.as_deref(),
    };
    value.unwrap_or(default)
}

fn parse_always_keys(raw: &[String]) -> Result<HashSet<Key>> {
    raw.iter()
        .map(|text| {
            let (cat, typ) = text
                .split_once('/')
                .with_context(|| format!("always-key {text:?} is not of the form CAT/TYP"))?;
            Ok(Key::new(cat, typ))
        })
        .collect()
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    })
}
