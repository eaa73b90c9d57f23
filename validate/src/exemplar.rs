//! Literal values that conform to a descriptor.

use dlhub_schema::{ArgumentType, Dimension, Shape, TypeDescriptor};
use ndarray::{ArrayD, IxDyn};

use crate::value::Value;

const NONE_TYPE: &str = "builtins.NoneType";

/// Most array elements an exemplar may hold, counted across nested arrays.
pub const EXEMPLAR_ELEMENT_LIMIT: usize = 1 << 20;

/// Builds a value that `descriptor` accepts.
///
/// Lists hold one element, wildcard dimensions have length 1 and an array of
/// any shape is a one-element vector. Array elements default to integer zero
/// when no item type is declared.
///
/// Returns `None` when the declared array shapes need more than
/// [`EXEMPLAR_ELEMENT_LIMIT`] elements.
#[must_use]
pub fn exemplar(descriptor: &TypeDescriptor) -> Option<Value> {
    build(descriptor, EXEMPLAR_ELEMENT_LIMIT)
}

/// `budget` bounds the array elements below this descriptor.
fn build(descriptor: &TypeDescriptor, budget: usize) -> Option<Value> {
    let value = match &descriptor.ty {
        ArgumentType::Boolean => Value::Bool(false),
        ArgumentType::Integer | ArgumentType::Number => Value::Int(0),
        ArgumentType::Float => Value::Float(0.0),
        ArgumentType::String => Value::Str(String::new()),
        ArgumentType::File => Value::File("input.dat".into()),
        ArgumentType::List { item_type } => Value::List(vec![build(item_type, budget)?]),
        ArgumentType::Tuple { element_types } => Value::Tuple(
            element_types
                .iter()
                .map(|element| build(element, budget))
                .collect::<Option<_>>()?,
        ),
        ArgumentType::Dict { properties } => Value::Dict(
            properties
                .iter()
                .map(|(key, property)| Some((key.clone(), build(property, budget)?)))
                .collect::<Option<_>>()?,
        ),
        ArgumentType::NdArray { shape, item_type } => {
            let dims: Vec<usize> = match shape {
                Shape::Any => vec![1],
                Shape::Dims(dims) => dims
                    .iter()
                    .map(|d| match d {
                        Dimension::Fixed(n) => *n,
                        Dimension::Any => 1,
                    })
                    .collect(),
            };
            // ndarray rejects shapes whose non-zero axes overflow isize, even when empty
            let nonzero = dims
                .iter()
                .filter(|&&n| n > 0)
                .try_fold(1usize, |acc, &n| acc.checked_mul(n))
                .filter(|&p| p <= isize::MAX.unsigned_abs())?;
            let count = if dims.contains(&0) { 0 } else { nonzero };
            if count > budget {
                return None;
            }
            let element = match item_type {
                Some(item) => build(item, budget / count.max(1))?,
                None => Value::Int(0),
            };
            Value::Array(ArrayD::from_elem(IxDyn(&dims), element))
        }
        ArgumentType::PythonObject { python_type } if python_type == NONE_TYPE => Value::None,
        ArgumentType::PythonObject { python_type } => Value::Object {
            python_type: python_type.clone(),
        },
    };
    Some(value)
}
