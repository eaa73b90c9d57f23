//! JSON wire format for type descriptors.
//!
//! The canonical document shape is the one DLHub publishes in servable
//! metadata:
//!
//! ```text
//! {"type": "<kind>", "description": "<text>",
//!  "shape": ["None", 2],            ndarray only
//!  "item_type": {"type": ...},      list / ndarray
//!  "element_types": [{...}, ...],   tuple only
//!  "properties": {"key": {...}},    dict only
//!  "python_type": "pkg.mod.Class"}  python object only
//! ```
//!
//! Reading applies the same required-field rules as [`Compose`](crate::Compose).
//! Kind-specific fields found on a kind that does not model them are kept in
//! [`TypeDescriptor::extra`] so that documents round-trip unchanged.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::{Result, SchemaError};
use crate::kind::Kind;
use crate::model::{ArgumentType, Dimension, Shape, TypeDescriptor};

/// Field names with a modeled meaning. Extra fields may not reuse them.
pub const RESERVED_FIELDS: &[&str] = &[
    "type",
    "description",
    "shape",
    "item_type",
    "element_types",
    "properties",
    "python_type",
];

/// Wildcard tokens accepted for a single dimension.
const WILDCARD_TOKENS: &[&str] = &["None", "Any"];

impl Dimension {
    /// Parses one dimension entry: a non-negative integer, a numeric string,
    /// `null`, or one of the wildcard tokens `"None"` / `"Any"`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] for anything else.
    pub fn from_json(value: &Value) -> Result<Self> {
        let invalid = |reason: String| SchemaError::InvalidField {
            field: "shape",
            reason,
        };
        match value {
            Value::Null => Ok(Dimension::Any),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Dimension::Fixed)
                .ok_or_else(|| invalid(format!("dimension {n} is not a non-negative integer"))),
            Value::String(s) if WILDCARD_TOKENS.contains(&s.as_str()) => Ok(Dimension::Any),
            Value::String(s) => s
                .trim()
                .parse::<usize>()
                .map(Dimension::Fixed)
                .map_err(|_| invalid(format!("unrecognized dimension token {s:?}"))),
            other => Err(invalid(format!("unrecognized dimension {other}"))),
        }
    }

    /// Returns the wire form: an integer, or `"None"` for a wildcard.
    #[must_use]
    pub fn to_json(self) -> Value {
        match self {
            Dimension::Fixed(n) => json!(n),
            Dimension::Any => json!("None"),
        }
    }
}

impl Shape {
    /// Parses a `shape` field: the string `"Any"` or a list of dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] if the field is neither, or if
    /// any dimension is malformed.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) if s == "Any" => Ok(Shape::Any),
            Value::Array(entries) => entries
                .iter()
                .map(Dimension::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Shape::Dims),
            other => Err(SchemaError::InvalidField {
                field: "shape",
                reason: format!("expected a list of dimensions or \"Any\", got {other}"),
            }),
        }
    }

    /// Returns the wire form of this shape.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Shape::Any => json!("Any"),
            Shape::Dims(dims) => Value::Array(dims.iter().map(|d| d.to_json()).collect()),
        }
    }
}

impl TypeDescriptor {
    /// Parses a descriptor from its JSON document.
    ///
    /// A nested type given as a bare string (e.g. `"item_type": "float"`) is
    /// expanded to the minimal descriptor `{"type": "float"}`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownKind`] for an unrecognized `type`,
    /// [`SchemaError::MissingField`] when a kind-specific field is absent,
    /// and [`SchemaError::InvalidField`] for malformed fields.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(SchemaError::InvalidField {
                field: "type",
                reason: format!("expected a JSON object, got {value}"),
            });
        };
        let mut fields = fields.clone();

        let kind = match fields.remove("type") {
            Some(Value::String(name)) => name.parse::<Kind>()?,
            Some(other) => {
                return Err(SchemaError::InvalidField {
                    field: "type",
                    reason: format!("expected a string, got {other}"),
                })
            }
            None => {
                return Err(SchemaError::InvalidField {
                    field: "type",
                    reason: "missing".to_owned(),
                })
            }
        };

        let description = match fields.remove("description") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(SchemaError::InvalidField {
                    field: "description",
                    reason: format!("expected a string, got {other}"),
                })
            }
        };

        let missing = |field: &'static str| SchemaError::MissingField { kind, field };

        let ty = match kind {
            Kind::NdArray => {
                let shape = fields
                    .remove("shape")
                    .ok_or_else(|| missing("shape"))
                    .and_then(|v| Shape::from_json(&v))?;
                if shape.is_empty() {
                    return Err(missing("shape"));
                }
                let item_type = fields
                    .remove("item_type")
                    .map(|v| nested(&v))
                    .transpose()?
                    .map(Box::new);
                ArgumentType::NdArray { shape, item_type }
            }
            Kind::List => {
                let item = fields.remove("item_type").ok_or_else(|| missing("item_type"))?;
                ArgumentType::List {
                    item_type: Box::new(nested(&item)?),
                }
            }
            Kind::Tuple => match fields.remove("element_types") {
                Some(Value::Array(elements)) => ArgumentType::Tuple {
                    element_types: elements.iter().map(nested).collect::<Result<_>>()?,
                },
                Some(other) => {
                    return Err(SchemaError::InvalidField {
                        field: "element_types",
                        reason: format!("expected a list, got {other}"),
                    })
                }
                None => return Err(missing("element_types")),
            },
            Kind::Dict => match fields.remove("properties") {
                Some(Value::Object(props)) => ArgumentType::Dict {
                    properties: props
                        .iter()
                        .map(|(k, v)| Ok((k.clone(), nested(v)?)))
                        .collect::<Result<BTreeMap<_, _>>>()?,
                },
                Some(other) => {
                    return Err(SchemaError::InvalidField {
                        field: "properties",
                        reason: format!("expected an object, got {other}"),
                    })
                }
                None => return Err(missing("properties")),
            },
            Kind::PythonObject => match fields.remove("python_type") {
                Some(Value::String(python_type)) => ArgumentType::PythonObject { python_type },
                Some(other) => {
                    return Err(SchemaError::InvalidField {
                        field: "python_type",
                        reason: format!("expected a dotted type name, got {other}"),
                    })
                }
                None => return Err(missing("python_type")),
            },
            Kind::Boolean => ArgumentType::Boolean,
            Kind::Integer => ArgumentType::Integer,
            Kind::Float => ArgumentType::Float,
            Kind::Number => ArgumentType::Number,
            Kind::String => ArgumentType::String,
            Kind::File => ArgumentType::File,
        };

        Ok(TypeDescriptor {
            description,
            ty,
            extra: fields,
        })
    }

    /// Returns the JSON document for this descriptor.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out: Map<String, Value> = self.extra.clone();
        out.insert("type".to_owned(), json!(self.kind().as_str()));
        out.insert("description".to_owned(), json!(self.description));
        match &self.ty {
            ArgumentType::NdArray { shape, item_type } => {
                out.insert("shape".to_owned(), shape.to_json());
                if let Some(item) = item_type {
                    out.insert("item_type".to_owned(), item.to_json());
                }
            }
            ArgumentType::List { item_type } => {
                out.insert("item_type".to_owned(), item_type.to_json());
            }
            ArgumentType::Tuple { element_types } => {
                out.insert(
                    "element_types".to_owned(),
                    Value::Array(element_types.iter().map(Self::to_json).collect()),
                );
            }
            ArgumentType::Dict { properties } => {
                out.insert(
                    "properties".to_owned(),
                    Value::Object(
                        properties
                            .iter()
                            .map(|(k, v)| (k.clone(), v.to_json()))
                            .collect(),
                    ),
                );
            }
            ArgumentType::PythonObject { python_type } => {
                out.insert("python_type".to_owned(), json!(python_type));
            }
            ArgumentType::Boolean
            | ArgumentType::Integer
            | ArgumentType::Float
            | ArgumentType::Number
            | ArgumentType::String
            | ArgumentType::File => {}
        }
        Value::Object(out)
    }
}

/// Parses a nested descriptor, expanding the bare-string shorthand.
fn nested(value: &Value) -> Result<TypeDescriptor> {
    match value {
        Value::String(name) => TypeDescriptor::from_json(&json!({ "type": name })),
        other => TypeDescriptor::from_json(other),
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TypeDescriptor::from_json(&value).map_err(D::Error::custom)
    }
}
