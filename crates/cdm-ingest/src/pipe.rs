//! The pipe-delimited table format shared by the event, example, and
//! feature tables: `|` delimiter, `\` escape, `"` quote, no doubled
//! quotes, no header row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{Reader, ReaderBuilder};

use crate::error::Result;

/// A `ReaderBuilder` preconfigured for the pipe format.
pub fn pipe_reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(b'|')
        .quote(b'"')
        .double_quote(false)
        .escape(Some(b'\\'))
        .has_headers(false)
        .flexible(true);
    builder
}

/// Wrap any byte stream in a pipe-format reader.
pub fn pipe_reader<R: Read>(reader: R) -> Reader<R> {
    pipe_reader_builder().from_reader(reader)
}

/// Open a pipe-format table file.
pub fn open_pipe_file(path: &Path) -> Result<Reader<File>> {
    Ok(pipe_reader_builder().from_path(path)?)
}
