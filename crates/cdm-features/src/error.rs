use cdm_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("feature {id}: unknown function {name:?}")]
    UnknownFunction { id: i64, name: String },
    #[error("feature {id}: inline lambda expressions are not supported")]
    LambdaUnsupported { id: i64 },
    #[error("unrecognized arguments value: {0}")]
    BadArguments(serde_json::Value),
    #[error("missing argument (index {index} / key {key:?})")]
    MissingArgument { index: usize, key: &'static str },
    #[error("unknown extractor {0:?}")]
    UnknownExtractor(String),
    #[error("example has no field {0}")]
    UnknownField(usize),
    #[error("cannot parse date {value:?} with format {format:?}")]
    DateParse { value: String, format: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, FeatureError>;
