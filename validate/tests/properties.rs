//! Property-based tests over generated descriptors.
//!
//! Descriptors are generated recursively from every kind. The properties
//! check that each has a conforming value, that validation is pure and that
//! descriptors and values survive their JSON forms.

use std::collections::BTreeMap;

use dlhub_schema::{ArgumentType, Dimension, Shape, TypeDescriptor};
use dlhub_validate::{exemplar, validate, Value};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = TypeDescriptor> {
    prop_oneof![
        Just(TypeDescriptor::from(ArgumentType::Boolean)),
        Just(TypeDescriptor::from(ArgumentType::Integer)),
        Just(TypeDescriptor::from(ArgumentType::Float)),
        Just(TypeDescriptor::from(ArgumentType::Number)),
        Just(TypeDescriptor::from(ArgumentType::String)),
        Just(TypeDescriptor::from(ArgumentType::File)),
        "[a-z]{1,6}\\.[A-Z][a-z]{0,6}".prop_map(TypeDescriptor::python_object),
        Just(TypeDescriptor::python_object("builtins.NoneType")),
    ]
}

fn dimension() -> impl Strategy<Value = Dimension> {
    prop_oneof![Just(Dimension::Any), (1usize..4).prop_map(Dimension::Fixed)]
}

fn ndarray() -> impl Strategy<Value = TypeDescriptor> {
    let shape = prop_oneof![
        Just(Shape::Any),
        prop::collection::vec(dimension(), 1..4).prop_map(Shape::Dims),
    ];
    (shape, prop::option::of(scalar()))
        .prop_map(|(shape, item)| TypeDescriptor::ndarray(shape, item))
}

fn descriptor() -> impl Strategy<Value = TypeDescriptor> {
    let leaf = prop_oneof![4 => scalar(), 1 => ndarray()];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeDescriptor::list),
            prop::collection::vec(inner.clone(), 0..4).prop_map(TypeDescriptor::tuple),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|properties: BTreeMap<String, TypeDescriptor>| {
                    TypeDescriptor::dict(properties)
                }),
        ]
    })
}

proptest! {
    /// Every generated descriptor has a value it accepts.
    #[test]
    fn prop_exemplar_conforms(d in descriptor()) {
        let value = exemplar(&d).unwrap();
        prop_assert!(validate(&value, &d).is_ok());
    }

    /// Validation neither mutates its inputs nor changes its answer.
    #[test]
    fn prop_validation_is_idempotent(d in descriptor(), other in descriptor()) {
        let value = exemplar(&other).unwrap();
        let (value_before, d_before) = (value.clone(), d.clone());
        let first = validate(&value, &d);
        let second = validate(&value, &d);
        prop_assert_eq!(first, second);
        prop_assert_eq!(value, value_before);
        prop_assert_eq!(d, d_before);
    }

    /// Descriptors read back from their wire form unchanged.
    #[test]
    fn prop_descriptor_wire_form_is_stable(d in descriptor()) {
        let read = TypeDescriptor::from_json(&d.to_json()).unwrap();
        prop_assert_eq!(read, d);
    }

    /// A conforming value still conforms after a trip through JSON.
    #[test]
    fn prop_lifted_exemplar_conforms(d in descriptor()) {
        let json = exemplar(&d).unwrap().to_json();
        prop_assert!(validate(&Value::lift(&json, &d), &d).is_ok());
    }
}
