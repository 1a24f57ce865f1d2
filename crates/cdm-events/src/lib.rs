pub mod builder;
pub mod periods;

pub use builder::{SequenceBuilder, SequenceOptions, sequences};
pub use periods::{PeriodOptions, Periods, periods};
