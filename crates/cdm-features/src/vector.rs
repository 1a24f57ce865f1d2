//! Sparse feature-vector assembly and SVMLight serialization.

use std::collections::{BTreeMap, HashSet};
use std::io;

use cdm_model::{Example, EventSequence, Key, Scalar};

use crate::error::Result;
use crate::index::FeatureIndex;

/// A sparse feature vector: feature id to value, falsy entries omitted.
pub type FeatureVector = BTreeMap<i64, Scalar>;

/// Apply the functions whose keys are present in the sequence.
///
/// The key set is the sequence's distinct fact keys, its distinct event
/// types, and any `always_keys` (for features whose keys never appear in
/// the data, such as example attributes). Cost scales with the keys
/// actually present, not with the number of registered definitions, and
/// only truthy results are stored.
pub fn vector(
    index: &FeatureIndex,
    example: &Example,
    sequence: &EventSequence,
    always_keys: &HashSet<Key>,
) -> Result<FeatureVector> {
    let mut keys: HashSet<&Key> = sequence.fact_keys().collect();
    keys.extend(sequence.types());
    keys.extend(always_keys.iter());

    let mut out = FeatureVector::new();
    for key in keys {
        let Some(functions) = index.functions(key) else {
            continue;
        };
        for (feature_id, function) in functions {
            let value = function(example, sequence)?;
            if value.is_truthy() {
                out.insert(*feature_id, value);
            }
        }
    }
    Ok(out)
}

/// Write one vector as an SVMLight line:
/// `<label>( <feature_id>:<value>)*`, feature ids ascending.
pub fn write_vector<W: io::Write>(
    out: &mut W,
    label: &str,
    vector: &FeatureVector,
) -> io::Result<()> {
    write!(out, "{label}")?;
    for (feature_id, value) in vector {
        write!(out, " {feature_id}:{value}")?;
    }
    writeln!(out)
}
