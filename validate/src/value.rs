//! Runtime values handed to a servable method.
//!
//! [`Value`] is the closed set of native shapes a caller may pass: scalars,
//! strings, file paths, lists, tuples, string-keyed dictionaries, n-dimensional
//! arrays and opaque objects. JSON has no tuples, arrays or paths, so
//! [`Value::lift`] uses a descriptor to decide which JSON arrays become tuples
//! or ndarrays and which strings name files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use dlhub_schema::{ArgumentType, Kind, Shape, TypeDescriptor};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde_json::{Map, Number, Value as Json};

/// A native value that can be checked against a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value.
    None,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A path to a file.
    File(PathBuf),
    /// An ordered, homogeneous sequence.
    List(Vec<Value>),
    /// A fixed-length, positional sequence.
    Tuple(Vec<Value>),
    /// A string-keyed mapping.
    Dict(BTreeMap<String, Value>),
    /// An n-dimensional array.
    Array(ArrayD<Value>),
    /// An opaque object of a named type.
    Object {
        /// Fully qualified type name.
        python_type: String,
    },
}

impl Value {
    /// Returns the name used for this value in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::File(_) => "file",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Array(_) => "ndarray",
            Value::Object { .. } => "python object",
        }
    }

    /// Returns true if this value is a native instance of `kind`.
    ///
    /// Booleans count as integers and numbers. The validator accepts them but
    /// records a warning. Every value is an instance of `python object`.
    #[must_use]
    pub fn is_instance_of(&self, kind: Kind) -> bool {
        match kind {
            Kind::Boolean => matches!(self, Value::Bool(_)),
            Kind::Integer => matches!(self, Value::Int(_) | Value::Bool(_)),
            Kind::Float => matches!(self, Value::Float(_)),
            Kind::Number => matches!(self, Value::Int(_) | Value::Float(_) | Value::Bool(_)),
            Kind::String => matches!(self, Value::Str(_)),
            Kind::File => matches!(self, Value::File(_)),
            Kind::NdArray => matches!(self, Value::Array(_)),
            Kind::List => matches!(self, Value::List(_)),
            Kind::Tuple => matches!(self, Value::Tuple(_)),
            Kind::Dict => matches!(self, Value::Dict(_)),
            Kind::PythonObject => true,
        }
    }

    /// Builds an ndarray from a shape and its elements in row-major order.
    ///
    /// Returns `None` if the element count does not match the shape.
    #[must_use]
    pub fn array(shape: &[usize], elements: Vec<Value>) -> Option<Self> {
        ArrayD::from_shape_vec(IxDyn(shape), elements)
            .ok()
            .map(Value::Array)
    }

    /// Converts JSON without descriptor guidance.
    ///
    /// Arrays become lists and objects become dictionaries. Integers that do
    /// not fit an `i64` become floats.
    #[must_use]
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => number(n),
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => Value::Dict(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts JSON using `descriptor` to recover tuples, ndarrays and files.
    ///
    /// Where the JSON does not have the structure the descriptor asks for, the
    /// plain [`Value::from_json`] conversion is used, so the validator reports
    /// the mismatch rather than the conversion hiding it. Nested arrays that
    /// are ragged stay lists.
    #[must_use]
    pub fn lift(json: &Json, descriptor: &TypeDescriptor) -> Self {
        match (&descriptor.ty, json) {
            (ArgumentType::File, Json::String(path)) => Value::File(PathBuf::from(path)),
            (ArgumentType::List { item_type }, Json::Array(items)) => Value::List(
                items.iter().map(|item| Value::lift(item, item_type)).collect(),
            ),
            (ArgumentType::Tuple { element_types }, Json::Array(items)) => Value::Tuple(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| match element_types.get(i) {
                        Some(element) => Value::lift(item, element),
                        None => Value::from_json(item),
                    })
                    .collect(),
            ),
            (ArgumentType::Dict { properties }, Json::Object(map)) => Value::Dict(
                map.iter()
                    .map(|(key, item)| {
                        let lifted = match properties.get(key) {
                            Some(property) => Value::lift(item, property),
                            None => Value::from_json(item),
                        };
                        (key.clone(), lifted)
                    })
                    .collect(),
            ),
            (ArgumentType::NdArray { shape, item_type }, Json::Array(_)) => {
                lift_array(json, shape, item_type.as_deref())
                    .unwrap_or_else(|| Value::from_json(json))
            }
            _ => Value::from_json(json),
        }
    }

    /// Converts back to JSON.
    ///
    /// Tuples and ndarrays become (nested) arrays, files become their path
    /// string and non-finite floats become `null`. An opaque object is
    /// written as `{"python_type": ...}`.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Value::None => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Str(s) => Json::String(s.clone()),
            Value::File(path) => Json::String(path.to_string_lossy().into_owned()),
            Value::List(items) | Value::Tuple(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Dict(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Value::Array(array) => array_to_json(array.view()),
            Value::Object { python_type } => {
                let mut map = Map::new();
                map.insert("python_type".to_owned(), Json::String(python_type.clone()));
                Json::Object(map)
            }
        }
    }
}

fn number(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

fn array_to_json(view: ArrayViewD<'_, Value>) -> Json {
    if view.ndim() == 0 {
        return view.iter().next().map_or(Json::Null, Value::to_json);
    }
    Json::Array(view.outer_iter().map(array_to_json).collect())
}

/// Reads nested JSON arrays as a rectangular ndarray.
///
/// The rank is the declared one, or the nesting depth along the first
/// elements when any shape is accepted. Returns `None` for ragged input.
fn lift_array(json: &Json, shape: &Shape, item: Option<&TypeDescriptor>) -> Option<Value> {
    let limit = shape.rank().unwrap_or(usize::MAX);
    let mut dims = Vec::new();
    let mut cursor = json;
    while dims.len() < limit {
        let Json::Array(items) = cursor else { break };
        dims.push(items.len());
        match items.first() {
            Some(first) => cursor = first,
            None => break,
        }
    }
    if dims.is_empty() {
        return None;
    }

    // dims only follow the first elements, so the input may still be ragged
    let mut leaves = Vec::new();
    collect_leaves(json, &dims, &mut leaves)?;
    let elements = leaves
        .into_iter()
        .map(|leaf| match item {
            Some(item) => Value::lift(leaf, item),
            None => Value::from_json(leaf),
        })
        .collect();
    Value::array(&dims, elements)
}

fn collect_leaves<'j>(json: &'j Json, dims: &[usize], leaves: &mut Vec<&'j Json>) -> Option<()> {
    let Some((&len, rest)) = dims.split_first() else {
        leaves.push(json);
        return Some(());
    };
    match json {
        Json::Array(items) if items.len() == len => {
            for item in items {
                collect_leaves(item, rest, leaves)?;
            }
            Some(())
        }
        _ => None,
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ArrayD<Value>> for Value {
    fn from(array: ArrayD<Value>) -> Self {
        Value::Array(array)
    }
}
