//! Lazy grouping of an ordered record stream into contiguous subject
//! chunks.
//!
//! The record source guarantees that rows sharing a subject id are
//! contiguous (the table need not be globally sorted by id, but groups are
//! never interleaved). Grouping is therefore a single comparison per row:
//! pull one record, compare its id to the previous one, start a new chunk
//! on change. The stream is restartable only from a fresh source; it is
//! not seekable.

use cdm_model::EventRecord;

use crate::error::Result;

/// Iterator adapter yielding one `Vec<EventRecord>` per contiguous id
/// group. Empty input yields no chunks. A read error is yielded in place;
/// records buffered before the error are dropped with it.
pub struct ChunkById<I> {
    inner: I,
    buffer: Vec<EventRecord>,
    done: bool,
}

impl<I> ChunkById<I>
where
    I: Iterator<Item = Result<EventRecord>>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            done: false,
        }
    }
}

impl<I> Iterator for ChunkById<I>
where
    I: Iterator<Item = Result<EventRecord>>,
{
    type Item = Result<Vec<EventRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.inner.next() {
                Some(Ok(record)) => {
                    let id_changed = self
                        .buffer
                        .last()
                        .is_some_and(|previous| previous.id != record.id);
                    if id_changed {
                        let chunk = std::mem::replace(&mut self.buffer, vec![record]);
                        return Some(Ok(chunk));
                    }
                    self.buffer.push(record);
                }
                Some(Err(err)) => {
                    self.done = true;
                    self.buffer.clear();
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    if self.buffer.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.buffer)));
                }
            }
        }
    }
}

/// Group an ordered record stream by contiguous subject id.
pub fn chunk_by_id<I>(records: I) -> ChunkById<I>
where
    I: Iterator<Item = Result<EventRecord>>,
{
    ChunkById::new(records)
}
