use std::fmt;

use crate::error::ModelError;

/// An atomic feature value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Sparse-vector convention: false, zero, and empty values are falsy
    /// and omitted from feature vectors.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Int(n) => *n != 0,
            Scalar::Float(x) => *x != 0.0,
            Scalar::Str(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", i64::from(*b)),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

/// The atomic data types feature definitions may declare, looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Bool,
    Float,
    Int,
    Str,
}

impl DataType {
    pub fn from_name(name: &str) -> Result<Self, ModelError> {
        match name {
            "bool" => Ok(DataType::Bool),
            "float" => Ok(DataType::Float),
            "int" => Ok(DataType::Int),
            "str" => Ok(DataType::Str),
            other => Err(ModelError::UnknownDataType(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Float => "float",
            DataType::Int => "int",
            DataType::Str => "str",
        }
    }

    /// The type's zero value: `false`, `0`, `0.0`, or the empty string.
    pub fn zero(self) -> Scalar {
        match self {
            DataType::Bool => Scalar::Bool(false),
            DataType::Float => Scalar::Float(0.0),
            DataType::Int => Scalar::Int(0),
            DataType::Str => Scalar::Str(String::new()),
        }
    }

    pub fn of_bool(self, value: bool) -> Scalar {
        match self {
            DataType::Bool => Scalar::Bool(value),
            DataType::Float => Scalar::Float(f64::from(u8::from(value))),
            DataType::Int => Scalar::Int(i64::from(value)),
            DataType::Str => Scalar::Str(value.to_string()),
        }
    }

    pub fn of_i64(self, value: i64) -> Scalar {
        match self {
            DataType::Bool => Scalar::Bool(value != 0),
            DataType::Float => Scalar::Float(value as f64),
            DataType::Int => Scalar::Int(value),
            DataType::Str => Scalar::Str(value.to_string()),
        }
    }

    pub fn of_f64(self, value: f64) -> Scalar {
        match self {
            DataType::Bool => Scalar::Bool(value != 0.0),
            DataType::Float => Scalar::Float(value),
            DataType::Int => Scalar::Int(value as i64),
            DataType::Str => Scalar::Str(value.to_string()),
        }
    }

    /// Cast an arbitrary scalar to this type. String sources are parsed for
    /// the numeric targets; any nonempty string is truthy for `bool`.
    pub fn cast(self, value: Scalar) -> Result<Scalar, ModelError> {
        match value {
            Scalar::Bool(b) => Ok(self.of_bool(b)),
            Scalar::Int(n) => Ok(self.of_i64(n)),
            Scalar::Float(x) => Ok(self.of_f64(x)),
            Scalar::Str(s) => match self {
                DataType::Str => Ok(Scalar::Str(s)),
                DataType::Bool => Ok(Scalar::Bool(!s.is_empty())),
                DataType::Int => s
                    .parse::<i64>()
                    .map(Scalar::Int)
                    .map_err(|_| ModelError::Cast {
                        value: s,
                        to: self.name(),
                    }),
                DataType::Float => s
                    .parse::<f64>()
                    .map(Scalar::Float)
                    .map_err(|_| ModelError::Cast {
                        value: s,
                        to: self.name(),
                    }),
            },
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
