//! Explicit name-to-factory registries for feature functions.
//!
//! A feature definition names its function as a string. Resolution walks
//! an ordered list of namespaces: first every namespace's constructor
//! table, then every namespace's bare-function table. Builtins come
//! first; callers append extension namespaces for their own functions.
//! Constructors receive the resolver so they can perform nested lookups
//! (e.g. a named event-value extractor).

use std::collections::HashMap;
use std::sync::Arc;

use cdm_model::{Event, Example, EventSequence, FeatureDefinition, Scalar};

use crate::error::{FeatureError, Result};

/// Object-safe alias trait behind [`FeatureFn`], so the trait object can
/// carry a `Debug` impl.
pub trait FeatureCall: Fn(&Example, &EventSequence) -> Result<Scalar> + Send + Sync {}

impl<F> FeatureCall for F where F: Fn(&Example, &EventSequence) -> Result<Scalar> + Send + Sync {}

impl std::fmt::Debug for dyn FeatureCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FeatureFn")
    }
}

/// A resolved feature function: pure over one example and one sequence.
pub type FeatureFn = Arc<dyn FeatureCall>;

/// Extracts a comparison value from an event, for the `*_matching`
/// feature families.
pub type Extractor = Arc<dyn Fn(&Event) -> Option<String> + Send + Sync>;

/// Builds a [`FeatureFn`] from a definition, closing over the
/// definition's literal fields at construction time.
pub trait FeatureFactory: Send + Sync {
    fn make(&self, def: &FeatureDefinition, resolver: &Resolver<'_>) -> Result<FeatureFn>;
}

impl<F> FeatureFactory for F
where
    F: Fn(&FeatureDefinition, &Resolver<'_>) -> Result<FeatureFn> + Send + Sync,
{
    fn make(&self, def: &FeatureDefinition, resolver: &Resolver<'_>) -> Result<FeatureFn> {
        self(def, resolver)
    }
}

/// One named collection of constructors, ready-made functions, and
/// extractors.
#[derive(Default)]
pub struct Namespace {
    constructors: HashMap<String, Box<dyn FeatureFactory>>,
    functions: HashMap<String, FeatureFn>,
    extractors: HashMap<String, Extractor>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_constructor(
        &mut self,
        name: impl Into<String>,
        factory: impl FeatureFactory + 'static,
    ) {
        self.constructors.insert(name.into(), Box::new(factory));
    }

    /// Register a stateless, parameterless function under its bare name.
    pub fn register_function(&mut self, name: impl Into<String>, function: FeatureFn) {
        self.functions.insert(name.into(), function);
    }

    pub fn register_extractor(&mut self, name: impl Into<String>, extractor: Extractor) {
        self.extractors.insert(name.into(), extractor);
    }

    fn constructor(&self, name: &str) -> Option<&dyn FeatureFactory> {
        self.constructors.get(name).map(Box::as_ref)
    }

    fn function(&self, name: &str) -> Option<&FeatureFn> {
        self.functions.get(name)
    }

    fn extractor(&self, name: &str) -> Option<&Extractor> {
        self.extractors.get(name)
    }
}

/// Ordered view over namespaces used to resolve definitions.
pub struct Resolver<'a> {
    namespaces: Vec<&'a Namespace>,
}

impl<'a> Resolver<'a> {
    pub fn new(namespaces: Vec<&'a Namespace>) -> Self {
        Self { namespaces }
    }

    /// Resolve one definition to a callable feature function.
    ///
    /// Constructors shadow bare functions of the same name, and earlier
    /// namespaces shadow later ones within each table.
    pub fn resolve(&self, def: &FeatureDefinition) -> Result<FeatureFn> {
        if def.function.starts_with("lambda") {
            return Err(FeatureError::LambdaUnsupported { id: def.id });
        }
        for namespace in &self.namespaces {
            if let Some(factory) = namespace.constructor(&def.function) {
                return factory.make(def, self);
            }
        }
        for namespace in &self.namespaces {
            if let Some(function) = namespace.function(&def.function) {
                return Ok(function.clone());
            }
        }
        Err(FeatureError::UnknownFunction {
            id: def.id,
            name: def.function.clone(),
        })
    }

    pub fn extractor(&self, name: &str) -> Option<Extractor> {
        self.namespaces
            .iter()
            .find_map(|namespace| namespace.extractor(name))
            .cloned()
    }
}
