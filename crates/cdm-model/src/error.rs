use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown data type: {0:?}")]
    UnknownDataType(String),
    #[error("cannot cast {value:?} to {to}")]
    Cast { value: String, to: &'static str },
}

pub type Result<T> = std::result::Result<T, ModelError>;
