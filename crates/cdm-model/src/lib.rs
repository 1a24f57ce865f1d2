pub mod error;
pub mod event;
pub mod example;
pub mod feature;
pub mod interval;
pub mod record;
pub mod scalar;
pub mod sequence;

pub use error::{ModelError, Result};
pub use event::{Event, Key};
pub use example::Example;
pub use feature::FeatureDefinition;
pub use interval::Interval;
pub use record::EventRecord;
pub use scalar::{DataType, Scalar};
pub use sequence::EventSequence;
