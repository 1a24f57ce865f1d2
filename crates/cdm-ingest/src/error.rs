use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}, field {field}: {message}")]
    Field {
        line: u64,
        field: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
