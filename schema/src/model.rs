//! Core descriptor model types.
//!
//! A [`TypeDescriptor`] is immutable data describing one input or output
//! slot of a servable method. Its [`ArgumentType`] is a closed tagged union:
//! every kind carries exactly the payload it needs, so a well-typed value of
//! this model cannot be missing a kind-specific field.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::kind::Kind;

/// One axis of an ndarray shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// The axis must have exactly this many entries.
    Fixed(usize),
    /// Any size is accepted on this axis (`"None"` / `"Any"` on the wire).
    Any,
}

impl Dimension {
    /// Returns true if an axis of length `len` satisfies this dimension.
    #[must_use]
    pub fn admits(self, len: usize) -> bool {
        match self {
            Dimension::Fixed(n) => n == len,
            Dimension::Any => true,
        }
    }
}

impl From<usize> for Dimension {
    fn from(n: usize) -> Self {
        Dimension::Fixed(n)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(n) => write!(f, "{n}"),
            Dimension::Any => f.write_str("None"),
        }
    }
}

/// Declared shape of an ndarray slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Any rank and any size (the bare string `"Any"` on the wire).
    Any,
    /// Exact rank, one entry per axis.
    Dims(Vec<Dimension>),
}

impl Shape {
    /// Returns the declared rank, or `None` when any rank is accepted.
    #[must_use]
    pub fn rank(&self) -> Option<usize> {
        match self {
            Shape::Any => None,
            Shape::Dims(dims) => Some(dims.len()),
        }
    }

    /// Returns true for a dimension list with no axes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Shape::Dims(dims) if dims.is_empty())
    }

    /// Returns true if an array with the given axis lengths fits this shape.
    #[must_use]
    pub fn admits(&self, actual: &[usize]) -> bool {
        match self {
            Shape::Any => true,
            Shape::Dims(dims) => {
                dims.len() == actual.len()
                    && dims.iter().zip(actual).all(|(d, &len)| d.admits(len))
            }
        }
    }
}

impl From<Vec<Dimension>> for Shape {
    fn from(dims: Vec<Dimension>) -> Self {
        Shape::Dims(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Any => f.write_str("Any"),
            Shape::Dims(dims) => {
                f.write_str("(")?;
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{d}")?;
                }
                if dims.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Kind tag plus the kind-specific payload of a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentType {
    /// A boolean.
    Boolean,
    /// An integer.
    Integer,
    /// A floating-point number.
    Float,
    /// An integer or floating-point number.
    Number,
    /// A string.
    String,
    /// A file handle or path.
    File,
    /// An n-dimensional array.
    NdArray {
        /// Required rank and axis sizes.
        shape: Shape,
        /// Element type, if declared.
        item_type: Option<Box<TypeDescriptor>>,
    },
    /// A homogeneous list.
    List {
        /// Type of every element.
        item_type: Box<TypeDescriptor>,
    },
    /// A fixed-arity tuple.
    Tuple {
        /// One descriptor per position.
        element_types: Vec<TypeDescriptor>,
    },
    /// A string-keyed mapping whose key set is `properties`' key set.
    Dict {
        /// Accepted keys and their value types. Empty means unconstrained.
        properties: BTreeMap<String, TypeDescriptor>,
    },
    /// An arbitrary Python object.
    PythonObject {
        /// Fully qualified dotted type name (informational).
        python_type: String,
    },
}

impl ArgumentType {
    /// Returns the kind tag of this type.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            ArgumentType::Boolean => Kind::Boolean,
            ArgumentType::Integer => Kind::Integer,
            ArgumentType::Float => Kind::Float,
            ArgumentType::Number => Kind::Number,
            ArgumentType::String => Kind::String,
            ArgumentType::File => Kind::File,
            ArgumentType::NdArray { .. } => Kind::NdArray,
            ArgumentType::List { .. } => Kind::List,
            ArgumentType::Tuple { .. } => Kind::Tuple,
            ArgumentType::Dict { .. } => Kind::Dict,
            ArgumentType::PythonObject { .. } => Kind::PythonObject,
        }
    }

    /// Returns the payload-free type for a scalar kind, or `None` for kinds
    /// that need a payload.
    #[must_use]
    pub fn scalar(kind: Kind) -> Option<Self> {
        match kind {
            Kind::Boolean => Some(ArgumentType::Boolean),
            Kind::Integer => Some(ArgumentType::Integer),
            Kind::Float => Some(ArgumentType::Float),
            Kind::Number => Some(ArgumentType::Number),
            Kind::String => Some(ArgumentType::String),
            Kind::File => Some(ArgumentType::File),
            Kind::NdArray | Kind::List | Kind::Tuple | Kind::Dict | Kind::PythonObject => None,
        }
    }
}

/// A declarative description of the expected type and shape of one value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Human-readable description; carries no validation semantics.
    pub description: String,
    /// Kind and kind-specific payload.
    pub ty: ArgumentType,
    /// Additional JSON fields carried verbatim (vendor metadata).
    pub extra: Map<String, Value>,
}

impl TypeDescriptor {
    /// Creates a descriptor with an empty description and no extra fields.
    #[must_use]
    pub fn new(ty: ArgumentType) -> Self {
        Self {
            description: String::new(),
            ty,
            extra: Map::new(),
        }
    }

    /// Returns the kind tag.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    /// Shorthand for a `list` of `item`.
    #[must_use]
    pub fn list(item: TypeDescriptor) -> Self {
        Self::new(ArgumentType::List {
            item_type: Box::new(item),
        })
    }

    /// Shorthand for a `tuple` of `elements`.
    #[must_use]
    pub fn tuple(elements: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self::new(ArgumentType::Tuple {
            element_types: elements.into_iter().collect(),
        })
    }

    /// Shorthand for a `dict` with the given properties.
    #[must_use]
    pub fn dict<K: Into<String>>(properties: impl IntoIterator<Item = (K, TypeDescriptor)>) -> Self {
        Self::new(ArgumentType::Dict {
            properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    /// Shorthand for an `ndarray` of the given shape and optional element type.
    #[must_use]
    pub fn ndarray(shape: impl Into<Shape>, item: Option<TypeDescriptor>) -> Self {
        Self::new(ArgumentType::NdArray {
            shape: shape.into(),
            item_type: item.map(Box::new),
        })
    }

    /// Shorthand for a `python object` of the given dotted type name.
    #[must_use]
    pub fn python_object(python_type: impl Into<String>) -> Self {
        Self::new(ArgumentType::PythonObject {
            python_type: python_type.into(),
        })
    }
}

impl From<ArgumentType> for TypeDescriptor {
    fn from(ty: ArgumentType) -> Self {
        Self::new(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_dimension_admits_anything() {
        assert!(Dimension::Any.admits(0));
        assert!(Dimension::Any.admits(1_000));
        assert!(Dimension::Fixed(2).admits(2));
        assert!(!Dimension::Fixed(2).admits(3));
    }

    #[test]
    fn shape_checks_rank_and_axes() {
        let shape = Shape::from(vec![Dimension::Any, Dimension::Fixed(2)]);
        assert!(shape.admits(&[1, 2]));
        assert!(shape.admits(&[5, 2]));
        assert!(!shape.admits(&[5, 3]));
        assert!(!shape.admits(&[2]));
        assert!(!shape.admits(&[1, 2, 2]));
        assert!(Shape::Any.admits(&[3, 4, 5]));
    }

    #[test]
    fn shape_display_reads_like_a_python_tuple() {
        assert_eq!(
            Shape::from(vec![Dimension::Any, Dimension::Fixed(2)]).to_string(),
            "(None, 2)"
        );
        assert_eq!(Shape::from(vec![Dimension::Fixed(3)]).to_string(), "(3,)");
        assert_eq!(Shape::Any.to_string(), "Any");
    }

    #[test]
    fn kind_follows_payload() {
        let d = TypeDescriptor::list(ArgumentType::Integer.into());
        assert_eq!(d.kind(), Kind::List);
        assert_eq!(TypeDescriptor::python_object("a.B").kind(), Kind::PythonObject);
    }
}
