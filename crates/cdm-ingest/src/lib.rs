pub mod error;
pub mod pipe;
pub mod records;
pub mod streaming;

pub use error::{IngestError, Result};
pub use pipe::{open_pipe_file, pipe_reader, pipe_reader_builder};
pub use records::{
    EventRecords, parse_event_record, parse_example, parse_feature_definition,
    read_event_records, read_examples, read_feature_definitions, try_parse_json,
};
pub use streaming::{ChunkById, chunk_by_id};
