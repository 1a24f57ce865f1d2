pub mod args;
pub mod builtins;
pub mod error;
pub mod index;
pub mod registry;
pub mod vector;

pub use args::{arg_index, arg_str, optional_arg, require_arg};
pub use builtins::builtin_namespace;
pub use error::{FeatureError, Result};
pub use index::{FeatureIndex, resolve_functions};
pub use registry::{Extractor, FeatureFactory, FeatureFn, Namespace, Resolver};
pub use vector::{FeatureVector, vector, write_vector};
