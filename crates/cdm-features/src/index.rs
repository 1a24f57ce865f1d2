//! The feature-key index: `(table, typ)` to the ordered functions
//! registered under it.

use std::collections::HashMap;

use cdm_model::{FeatureDefinition, Key};

use crate::error::Result;
use crate::registry::{FeatureFn, Resolver};

/// Resolve every definition, in order. The first unresolvable definition
/// fails the whole build.
pub fn resolve_functions(
    definitions: &[FeatureDefinition],
    resolver: &Resolver<'_>,
) -> Result<Vec<(i64, FeatureFn)>> {
    definitions
        .iter()
        .map(|def| Ok((def.id, resolver.resolve(def)?)))
        .collect()
}

/// Maps each feature key to the `(feature_id, function)` pairs sharing
/// it, insertion order preserved. Built once, read-only afterwards, and
/// safe to share across any number of assembler invocations.
pub struct FeatureIndex {
    by_key: HashMap<Key, Vec<(i64, FeatureFn)>>,
}

impl FeatureIndex {
    pub fn build(definitions: &[FeatureDefinition], resolver: &Resolver<'_>) -> Result<Self> {
        let mut by_key: HashMap<Key, Vec<(i64, FeatureFn)>> = HashMap::new();
        for (def, (id, function)) in definitions
            .iter()
            .zip(resolve_functions(definitions, resolver)?)
        {
            by_key.entry(def.key()).or_default().push((id, function));
        }
        tracing::debug!(
            n_features = definitions.len(),
            n_keys = by_key.len(),
            "built feature index"
        );
        Ok(Self { by_key })
    }

    /// The functions registered under this key, if any.
    pub fn functions(&self, key: &Key) -> Option<&[(i64, FeatureFn)]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    pub fn n_keys(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
