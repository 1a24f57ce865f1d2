use std::collections::HashMap;

use crate::event::{Event, Key};

/// One subject's history: ordered events plus timeless facts.
///
/// Owns its events and facts exclusively. Constructed once per subject
/// group and never mutated afterward; derived views are produced as new,
/// independent sequences via [`EventSequence::subsequence`].
///
/// Facts keep insertion order, but lookup is by exact key with map
/// semantics: when several facts share a key, the last-inserted one wins.
#[derive(Debug, Clone)]
pub struct EventSequence {
    id: i64,
    events: Vec<Event>,
    facts: Vec<(Key, Option<String>)>,
    fact_lookup: HashMap<Key, usize>,
    type_counts: HashMap<Key, usize>,
}

impl EventSequence {
    pub fn new(id: i64, events: Vec<Event>, facts: Vec<(Key, Option<String>)>) -> Self {
        let mut fact_lookup = HashMap::new();
        for (index, (key, _)) in facts.iter().enumerate() {
            fact_lookup.insert(key.clone(), index);
        }
        let mut type_counts: HashMap<Key, usize> = HashMap::new();
        for event in &events {
            *type_counts.entry(event.key.clone()).or_default() += 1;
        }
        Self {
            id,
            events,
            facts,
            fact_lookup,
            type_counts,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Events in their original order. Callers feeding the period
    /// segmenter rely on the record source having ordered them by start
    /// time; the sequence itself never sorts.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn n_events(&self) -> usize {
        self.events.len()
    }

    /// The value of the fact with this exact key. `None` when the key is
    /// absent or the fact's value is null.
    pub fn fact(&self, key: &Key) -> Option<&str> {
        let index = *self.fact_lookup.get(key)?;
        self.facts[index].1.as_deref()
    }

    pub fn has_fact(&self, key: &Key) -> bool {
        self.fact_lookup.contains_key(key)
    }

    /// Facts in insertion order, duplicates included.
    pub fn facts(&self) -> impl Iterator<Item = (&Key, Option<&str>)> {
        self.facts.iter().map(|(key, val)| (key, val.as_deref()))
    }

    /// Distinct fact keys.
    pub fn fact_keys(&self) -> impl Iterator<Item = &Key> {
        self.fact_lookup.keys()
    }

    /// Distinct event type keys.
    pub fn types(&self) -> impl Iterator<Item = &Key> {
        self.type_counts.keys()
    }

    pub fn has_type(&self, key: &Key) -> bool {
        self.type_counts.contains_key(key)
    }

    pub fn n_events_of_type(&self, key: &Key) -> usize {
        self.type_counts.get(key).copied().unwrap_or(0)
    }

    pub fn events_of_type<'a>(&'a self, key: &'a Key) -> impl Iterator<Item = &'a Event> {
        self.events.iter().filter(move |event| &event.key == key)
    }

    /// A new, independent sequence holding the events that intersect
    /// `[lo, hi]`. Facts and the id carry over unchanged.
    pub fn subsequence(&self, lo: f64, hi: f64) -> EventSequence {
        let events = self
            .events
            .iter()
            .filter(|event| event.interval.lo <= hi && lo <= event.interval.hi)
            .cloned()
            .collect();
        EventSequence::new(self.id, events, self.facts.clone())
    }
}
