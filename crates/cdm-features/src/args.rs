//! Accessors for the heterogeneous `args` field of a feature definition.
//!
//! `args` is a `serde_json::Value` and may be a list (accessed by index),
//! a map (accessed by key), an atomic scalar (returned as-is, the common
//! single-unnamed-argument case), or `Null` (absent). Empty lists and maps
//! are malformed.

use serde_json::Value;

use crate::error::{FeatureError, Result};

/// The argument at `index` / `key`, or the whole value when atomic.
pub fn require_arg<'a>(args: &'a Value, index: usize, key: &'static str) -> Result<&'a Value> {
    match args {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(FeatureError::BadArguments(args.clone()));
            }
            items
                .get(index)
                .ok_or(FeatureError::MissingArgument { index, key })
        }
        Value::Object(map) => {
            if map.is_empty() {
                return Err(FeatureError::BadArguments(args.clone()));
            }
            map.get(key)
                .ok_or(FeatureError::MissingArgument { index, key })
        }
        _ => Ok(args),
    }
}

/// Like [`require_arg`] but absent entries yield `None` instead of an
/// error. `atomic` controls whether a bare scalar passes through as this
/// argument; constructors with several optional knobs set it on at most
/// one of them.
pub fn optional_arg<'a>(
    args: &'a Value,
    index: usize,
    key: &'static str,
    atomic: bool,
) -> Result<Option<&'a Value>> {
    match args {
        Value::Null => Ok(None),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(FeatureError::BadArguments(args.clone()));
            }
            Ok(items.get(index))
        }
        Value::Object(map) => {
            if map.is_empty() {
                return Err(FeatureError::BadArguments(args.clone()));
            }
            Ok(map.get(key))
        }
        _ => Ok(if atomic { Some(args) } else { None }),
    }
}

/// A string argument value. `Null` reads as absent.
pub fn arg_str(value: &Value) -> Option<&str> {
    value.as_str()
}

/// A non-negative index argument, given as a number or numeric string.
pub fn arg_index(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    value.as_str().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_access_by_index() {
        let args = json!([",", "value"]);
        assert_eq!(require_arg(&args, 0, "delimiter").unwrap(), &json!(","));
        assert_eq!(require_arg(&args, 1, "extractor").unwrap(), &json!("value"));
        assert!(matches!(
            require_arg(&args, 2, "other"),
            Err(FeatureError::MissingArgument { index: 2, .. })
        ));
    }

    #[test]
    fn map_access_by_key() {
        let args = json!({"field_index": 6});
        assert_eq!(require_arg(&args, 0, "field_index").unwrap(), &json!(6));
        assert!(require_arg(&args, 0, "missing").is_err());
    }

    #[test]
    fn atomic_passthrough() {
        let args = json!(6);
        assert_eq!(require_arg(&args, 0, "field_index").unwrap(), &json!(6));
        assert_eq!(
            optional_arg(&args, 0, "delimiter", true).unwrap(),
            Some(&json!(6))
        );
        assert_eq!(optional_arg(&args, 0, "delimiter", false).unwrap(), None);
    }

    #[test]
    fn null_is_absent_for_optional() {
        let args = Value::Null;
        assert_eq!(optional_arg(&args, 0, "delimiter", true).unwrap(), None);
        // require_arg passes Null through; typed conversion rejects it.
        assert_eq!(require_arg(&args, 0, "x").unwrap(), &Value::Null);
        assert_eq!(arg_str(&Value::Null), None);
    }

    #[test]
    fn empty_collections_are_malformed() {
        assert!(matches!(
            require_arg(&json!([]), 0, "x"),
            Err(FeatureError::BadArguments(_))
        ));
        assert!(matches!(
            optional_arg(&json!({}), 0, "x", true),
            Err(FeatureError::BadArguments(_))
        ));
    }

    #[test]
    fn index_from_number_or_string() {
        assert_eq!(arg_index(&json!(6)), Some(6));
        assert_eq!(arg_index(&json!("6")), Some(6));
        assert_eq!(arg_index(&json!(-1)), None);
        assert_eq!(arg_index(&json!("x")), None);
    }
}
