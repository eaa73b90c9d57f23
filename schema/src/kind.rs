//! The closed set of argument type kinds.

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Primary tag of a type descriptor.
///
/// The wire names are the strings DLHub stores in the `type` field; note
/// that `PythonObject` is spelled with a space (`"python object"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// `"boolean"`.
    Boolean,
    /// `"integer"`. Booleans are accepted with a warning.
    Integer,
    /// `"float"`.
    Float,
    /// `"number"`: integer or float.
    Number,
    /// `"string"`.
    String,
    /// `"file"`: a file handle or path.
    File,
    /// `"ndarray"`: an n-dimensional array.
    NdArray,
    /// `"list"`: homogeneous sequence.
    List,
    /// `"tuple"`: fixed-arity heterogeneous sequence.
    Tuple,
    /// `"dict"`: string-keyed mapping with a closed key set.
    Dict,
    /// `"python object"`: any value.
    PythonObject,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 11] = [
        Kind::Boolean,
        Kind::Integer,
        Kind::Float,
        Kind::Number,
        Kind::String,
        Kind::File,
        Kind::NdArray,
        Kind::List,
        Kind::Tuple,
        Kind::Dict,
        Kind::PythonObject,
    ];

    /// Returns the wire name used in the `type` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::File => "file",
            Kind::NdArray => "ndarray",
            Kind::List => "list",
            Kind::Tuple => "tuple",
            Kind::Dict => "dict",
            Kind::PythonObject => "python object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKind(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_parse_back() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>(), Ok(kind));
        }
    }

    #[test]
    fn python_object_keeps_its_space() {
        assert_eq!("python object".parse::<Kind>(), Ok(Kind::PythonObject));
        assert!("python_object".parse::<Kind>().is_err());
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "complex".parse::<Kind>(),
            Err(SchemaError::UnknownKind("complex".to_owned()))
        );
        // Wire names are case-sensitive.
        assert!("Integer".parse::<Kind>().is_err());
    }
}
