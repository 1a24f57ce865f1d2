//! Piecewise-constant period segmentation of overlapping timed events.
//!
//! Converts a stream of (possibly overlapping, noisy) events carrying a
//! value into a disjoint, gap-filled sequence of `(Interval, value)`
//! periods approximating the underlying piecewise-constant signal. Three
//! stages:
//!
//! 1. candidates: apply the minimum-length floor, drop zero-valued and
//!    out-of-span events, clip to the span;
//! 2. merge: a single left-to-right pass that merges equal-valued
//!    touching periods and truncates earlier periods under later ones of
//!    a different value;
//! 3. gap fill: walk the disjoint periods lazily, backing endpoints off
//!    at transitions and filling gaps with the zero value.
//!
//! Input events must already be ordered by interval start. The algorithm
//! never sorts and never raises on unsorted input; the result is simply
//! wrong. That precondition is the caller's obligation.

use cdm_model::{Event, Interval};

/// Segmentation parameters.
///
/// `zero_values` membership uses exact equality: an integer `0` and a
/// string `"0"` are distinct zero markers, so callers must pick one
/// representation and use it consistently.
#[derive(Debug, Clone)]
pub struct PeriodOptions<V> {
    /// Values treated as "no signal"; events carrying one are dropped.
    pub zero_values: Vec<V>,
    /// Minimum period length, applied to each event before clipping.
    pub min_len: f64,
    /// Gap width kept clear before each period start at transitions.
    pub backoff: f64,
    /// Value assigned to filler periods.
    pub output_zero: V,
    /// Inclusive lower span bound, when present.
    pub span_lo: Option<f64>,
    /// Inclusive upper span bound, when present.
    pub span_hi: Option<f64>,
}

impl<V: Clone> PeriodOptions<V> {
    /// Defaults: `zero_values` holds only `output_zero`, no minimum
    /// length, no backoff, unbounded span.
    pub fn new(output_zero: V) -> Self {
        Self {
            zero_values: vec![output_zero.clone()],
            min_len: 0.0,
            backoff: 0.0,
            output_zero,
            span_lo: None,
            span_hi: None,
        }
    }

    pub fn zero_values(mut self, values: Vec<V>) -> Self {
        self.zero_values = values;
        self
    }

    pub fn min_len(mut self, min_len: f64) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn backoff(mut self, backoff: f64) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn span(mut self, lo: f64, hi: f64) -> Self {
        self.span_lo = Some(lo);
        self.span_hi = Some(hi);
        self
    }

    pub fn span_lo(mut self, lo: f64) -> Self {
        self.span_lo = Some(lo);
        self
    }

    pub fn span_hi(mut self, hi: f64) -> Self {
        self.span_hi = Some(hi);
        self
    }
}

/// Segment `events` into disjoint, gap-filled periods.
///
/// `value_of` extracts each event's signal value. Events must be sorted
/// by `interval.lo` ascending. The returned iterator is lazy and finite;
/// with no surviving candidates and a bounded span it yields exactly one
/// filler period covering the whole span.
pub fn periods<V, F>(events: &[Event], value_of: F, options: &PeriodOptions<V>) -> Periods<V>
where
    V: Clone + PartialEq,
    F: Fn(&Event) -> V,
{
    let candidates = collect_candidates(events, &value_of, options);
    let merged = merge_candidates(candidates);
    tracing::trace!(
        n_events = events.len(),
        n_periods = merged.len(),
        "segmented events into periods"
    );
    Periods {
        merged,
        index: 0,
        cursor: options.span_lo,
        pending: None,
        tail_done: false,
        backoff: options.backoff,
        output_zero: options.output_zero.clone(),
        span_hi: options.span_hi,
    }
}

/// Stage 1: one candidate per surviving event, in input order.
fn collect_candidates<V, F>(
    events: &[Event],
    value_of: &F,
    options: &PeriodOptions<V>,
) -> Vec<(f64, f64, V)>
where
    V: Clone + PartialEq,
    F: Fn(&Event) -> V,
{
    let mut candidates = Vec::new();
    for event in events {
        let mut lo = event.interval.lo;
        // Length floor applies before clipping.
        let mut hi = event.interval.hi.max(lo + options.min_len);
        let value = value_of(event);
        if options.zero_values.contains(&value) {
            continue;
        }
        if options.span_lo.is_some_and(|span_lo| hi < span_lo)
            || options.span_hi.is_some_and(|span_hi| lo > span_hi)
        {
            continue;
        }
        if let Some(span_lo) = options.span_lo {
            lo = lo.max(span_lo);
        }
        if let Some(span_hi) = options.span_hi {
            hi = hi.min(span_hi);
        }
        candidates.push((lo, hi, value));
    }
    candidates
}

/// Stage 2: merge equal-valued touching periods; where differing periods
/// overlap, truncate the earlier one so the chronologically later value
/// wins. Single left-to-right pass over the candidate list.
fn merge_candidates<V: PartialEq>(mut candidates: Vec<(f64, f64, V)>) -> Vec<(f64, f64, V)> {
    let mut merge = 0;
    while merge + 1 < candidates.len() {
        let (hi1, lo2) = (candidates[merge].1, candidates[merge + 1].0);
        if hi1 >= lo2 && candidates[merge].2 == candidates[merge + 1].2 {
            // Same value, touching or overlapping: absorb the next period
            // and re-compare at the same index.
            let (_, next_hi, _) = candidates.remove(merge + 1);
            candidates[merge].1 = next_hi;
        } else {
            if hi1 > lo2 {
                candidates[merge].1 = lo2;
            }
            merge += 1;
        }
    }
    candidates
}

/// Stage 3 as a lazy iterator: disjoint periods interleaved with filler
/// periods, endpoints backed off at transitions.
pub struct Periods<V> {
    merged: Vec<(f64, f64, V)>,
    index: usize,
    cursor: Option<f64>,
    pending: Option<(Interval, V)>,
    tail_done: bool,
    backoff: f64,
    output_zero: V,
    span_hi: Option<f64>,
}

impl<V: Clone> Iterator for Periods<V> {
    type Item = (Interval, V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(period) = self.pending.take() {
            return Some(period);
        }
        if self.index < self.merged.len() {
            let (lo, hi, ref value) = self.merged[self.index];
            // Back the end off the next period's start, but never below
            // this period's own start.
            let backed_hi = match self.merged.get(self.index + 1) {
                Some(&(next_lo, _, _)) => hi.min(next_lo - self.backoff).max(lo),
                None => hi,
            };
            let period = (Interval::new(lo, backed_hi), value.clone());
            let gap_end = lo - self.backoff;
            let filler = match self.cursor {
                Some(cursor) if cursor < gap_end => Some((
                    Interval::new(cursor, gap_end),
                    self.output_zero.clone(),
                )),
                _ => None,
            };
            self.cursor = Some(backed_hi + self.backoff);
            self.index += 1;
            return match filler {
                Some(filler) => {
                    self.pending = Some(period);
                    Some(filler)
                }
                None => Some(period),
            };
        }
        if !self.tail_done {
            self.tail_done = true;
            if let (Some(cursor), Some(span_hi)) = (self.cursor, self.span_hi)
                && cursor < span_hi
            {
                return Some((Interval::new(cursor, span_hi), self.output_zero.clone()));
            }
        }
        None
    }
}
