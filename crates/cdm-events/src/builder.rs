//! Assembling contiguous record groups into event sequences.

use std::collections::HashSet;

use cdm_model::{Event, EventRecord, EventSequence, Interval, Key};

/// Builds one [`EventSequence`] from one contiguous group of records.
///
/// A record with both times absent becomes a fact; any other record
/// becomes an event (a one-sided time yields a degenerate interval at the
/// present endpoint). Record order is preserved and nothing is sorted:
/// events are expected to arrive ordered by start time, which is the
/// record source's obligation.
#[derive(Debug, Default)]
pub struct SequenceBuilder {
    id: Option<i64>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the sequence id explicitly instead of taking it from the
    /// first record.
    pub fn with_id(id: i64) -> Self {
        Self { id: Some(id) }
    }

    pub fn build<I>(self, records: I) -> EventSequence
    where
        I: IntoIterator<Item = EventRecord>,
    {
        let mut id = self.id;
        let mut events = Vec::new();
        let mut facts = Vec::new();
        for record in records {
            if id.is_none() {
                id = record.id;
            }
            let key = Key::new(
                record.cat.unwrap_or_default(),
                record.typ.unwrap_or_default(),
            );
            match (record.lo, record.hi) {
                (None, None) => facts.push((key, record.val)),
                (lo, hi) => {
                    let lo = lo.or(hi).unwrap_or_default();
                    let hi = record.hi.unwrap_or(lo);
                    events.push(Event::new(Interval::new(lo, hi), key, record.val, record.jsn));
                }
            }
        }
        EventSequence::new(id.unwrap_or_default(), events, facts)
    }
}

/// Options for turning a chunked record stream into event sequences,
/// mirroring the record-processing hooks of the original reader: an
/// include-id set that skips whole groups before any per-record work, a
/// per-record filter, and a per-record transform (applied in that order).
#[derive(Default)]
pub struct SequenceOptions {
    pub include_ids: Option<HashSet<i64>>,
    pub filter: Option<Box<dyn Fn(&EventRecord) -> bool>>,
    pub transform: Option<Box<dyn Fn(EventRecord) -> EventRecord>>,
}

impl SequenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_ids(mut self, ids: HashSet<i64>) -> Self {
        self.include_ids = Some(ids);
        self
    }

    pub fn filter(mut self, predicate: impl Fn(&EventRecord) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    pub fn transform(mut self, transform: impl Fn(EventRecord) -> EventRecord + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }
}

/// Map a stream of contiguous record chunks to a lazy stream of event
/// sequences. Errors from the chunk source pass through unchanged.
pub fn sequences<I, E>(
    chunks: I,
    options: SequenceOptions,
) -> impl Iterator<Item = Result<EventSequence, E>>
where
    I: Iterator<Item = Result<Vec<EventRecord>, E>>,
{
    chunks.filter_map(move |chunk| {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => return Some(Err(err)),
        };
        let group_id = chunk.first().and_then(|record| record.id);
        if let (Some(include), Some(id)) = (&options.include_ids, group_id)
            && !include.contains(&id)
        {
            tracing::trace!(id, "skipping excluded sequence");
            return None;
        }
        let records = chunk
            .into_iter()
            .filter(|record| options.filter.as_ref().is_none_or(|keep| keep(record)))
            .map(|record| match &options.transform {
                Some(transform) => transform(record),
                None => record,
            });
        let builder = match group_id {
            Some(id) => SequenceBuilder::with_id(id),
            None => SequenceBuilder::new(),
        };
        Some(Ok(builder.build(records)))
    })
}
