//! Checked construction of type descriptors.
//!
//! [`Compose`] assembles one descriptor from a kind, a description and the
//! kind-specific parameters, rejecting authoring mistakes before the
//! descriptor is published:
//!
//! ```
//! use dlhub_schema::{Compose, Dimension, Kind, Shape};
//!
//! let features = Compose::new(Kind::NdArray, "Feature matrix")
//!     .shape(Shape::from(vec![Dimension::Any, Dimension::Fixed(2)]))
//!     .item_type("float")
//!     .build()
//!     .expect("shape is set");
//! assert_eq!(features.kind(), Kind::NdArray);
//!
//! assert!(Compose::new(Kind::List, "Rows").build().is_err());
//! ```

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::error::{Result, SchemaError};
use crate::kind::Kind;
use crate::model::{ArgumentType, Shape, TypeDescriptor};
use crate::wire::RESERVED_FIELDS;

/// A nested type given either as a full descriptor or as a kind name.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemType {
    /// A complete nested descriptor.
    Descriptor(TypeDescriptor),
    /// A bare kind name such as `"float"`, expanded to `{"type": "float"}`.
    Shorthand(String),
}

impl ItemType {
    /// Resolves the shorthand form into a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownKind`] for an unrecognized shorthand, or
    /// [`SchemaError::MissingField`] if the shorthand names a kind that needs
    /// a payload (e.g. `"list"`).
    pub fn resolve(self) -> Result<TypeDescriptor> {
        match self {
            ItemType::Descriptor(d) => Ok(d),
            ItemType::Shorthand(name) => TypeDescriptor::from_json(&json!({ "type": name })),
        }
    }
}

impl From<TypeDescriptor> for ItemType {
    fn from(d: TypeDescriptor) -> Self {
        ItemType::Descriptor(d)
    }
}

impl From<&str> for ItemType {
    fn from(name: &str) -> Self {
        ItemType::Shorthand(name.to_owned())
    }
}

impl From<Kind> for ItemType {
    fn from(kind: Kind) -> Self {
        ItemType::Shorthand(kind.as_str().to_owned())
    }
}

/// Builder for a single [`TypeDescriptor`].
#[derive(Debug, Clone)]
pub struct Compose {
    kind: Kind,
    description: String,
    shape: Option<Shape>,
    item_type: Option<ItemType>,
    python_type: Option<String>,
    properties: Option<BTreeMap<String, TypeDescriptor>>,
    element_types: Option<Vec<ItemType>>,
    extra: Map<String, Value>,
}

impl Compose {
    /// Starts a descriptor of `kind` with a human-readable description.
    #[must_use]
    pub fn new(kind: Kind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            shape: None,
            item_type: None,
            python_type: None,
            properties: None,
            element_types: None,
            extra: Map::new(),
        }
    }

    /// Sets the ndarray shape.
    #[must_use]
    pub fn shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    /// Sets the element type of a list or ndarray.
    #[must_use]
    pub fn item_type(mut self, item: impl Into<ItemType>) -> Self {
        self.item_type = Some(item.into());
        self
    }

    /// Sets the dotted type name of a python object.
    #[must_use]
    pub fn python_type(mut self, python_type: impl Into<String>) -> Self {
        self.python_type = Some(python_type.into());
        self
    }

    /// Sets the closed key set of a dict.
    #[must_use]
    pub fn properties<K: Into<String>>(
        mut self,
        properties: impl IntoIterator<Item = (K, TypeDescriptor)>,
    ) -> Self {
        self.properties = Some(
            properties
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        );
        self
    }

    /// Sets the positional element types of a tuple.
    #[must_use]
    pub fn element_types<T: Into<ItemType>>(mut self, elements: impl IntoIterator<Item = T>) -> Self {
        self.element_types = Some(elements.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a verbatim extra field.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Validates the parameters and produces the descriptor.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::MissingField`] when the kind's required field is absent
    ///   (an empty ndarray dimension list counts as absent).
    /// - [`SchemaError::UnexpectedField`] when a field is set that the kind
    ///   does not model.
    /// - [`SchemaError::ReservedField`] when an extra key shadows a modeled field.
    /// - [`SchemaError::UnknownKind`] when a shorthand item type is unrecognized.
    pub fn build(self) -> Result<TypeDescriptor> {
        let kind = self.kind;

        if let Some(key) = self
            .extra
            .keys()
            .find(|k| RESERVED_FIELDS.contains(&k.as_str()))
        {
            return Err(SchemaError::ReservedField(key.clone()));
        }

        let unexpected = |field: &'static str| SchemaError::UnexpectedField { kind, field };
        if self.shape.is_some() && kind != Kind::NdArray {
            return Err(unexpected("shape"));
        }
        if self.item_type.is_some() && !matches!(kind, Kind::List | Kind::NdArray) {
            return Err(unexpected("item_type"));
        }
        if self.element_types.is_some() && kind != Kind::Tuple {
            return Err(unexpected("element_types"));
        }
        if self.properties.is_some() && kind != Kind::Dict {
            return Err(unexpected("properties"));
        }
        if self.python_type.is_some() && kind != Kind::PythonObject {
            return Err(unexpected("python_type"));
        }

        let missing = |field: &'static str| SchemaError::MissingField { kind, field };
        let item_type = self.item_type.map(ItemType::resolve).transpose()?;

        let ty = match kind {
            Kind::NdArray => {
                let shape = self
                    .shape
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| missing("shape"))?;
                ArgumentType::NdArray {
                    shape,
                    item_type: item_type.map(Box::new),
                }
            }
            Kind::List => ArgumentType::List {
                item_type: Box::new(item_type.ok_or_else(|| missing("item_type"))?),
            },
            Kind::Tuple => ArgumentType::Tuple {
                element_types: self
                    .element_types
                    .ok_or_else(|| missing("element_types"))?
                    .into_iter()
                    .map(ItemType::resolve)
                    .collect::<Result<_>>()?,
            },
            Kind::Dict => ArgumentType::Dict {
                properties: self.properties.ok_or_else(|| missing("properties"))?,
            },
            Kind::PythonObject => ArgumentType::PythonObject {
                python_type: self.python_type.ok_or_else(|| missing("python_type"))?,
            },
            Kind::Boolean | Kind::Integer | Kind::Float | Kind::Number | Kind::String | Kind::File => {
                ArgumentType::scalar(kind).ok_or_else(|| SchemaError::UnknownKind(kind.to_string()))?
            }
        };

        Ok(TypeDescriptor {
            description: self.description,
            ty,
            extra: self.extra,
        })
    }
}
