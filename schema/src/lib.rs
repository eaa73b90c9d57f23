//! DLHub argument type descriptors encoded as typed Rust data.
//!
//! The `dlhub-schema` crate models the declarative schema DLHub uses to
//! describe the inputs and outputs of a servable method: a closed set of
//! [`Kind`]s, a [`TypeDescriptor`] whose [`ArgumentType`] carries the
//! kind-specific payload, a checked [`Compose`] builder, and the JSON wire
//! format the descriptors are published in.
//!
//! # Entry Point
//!
//! ```
//! use dlhub_schema::{Compose, Kind, TypeDescriptor};
//!
//! let row = Compose::new(Kind::Tuple, "A labeled sample")
//!     .element_types(["integer", "integer", "string"])
//!     .build()
//!     .unwrap();
//! let wire = row.to_json();
//! assert_eq!(TypeDescriptor::from_json(&wire).unwrap(), row);
//! ```
//!
//! # Modules
//!
//! - [`compose`]: the checked builder
//! - [`wire`]: JSON reading and writing
//! - [`hint`]: descriptors from Python-style type hints
//! - [`servable`]: method metadata of a published servable

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod compose;
pub mod error;
pub mod hint;
pub mod kind;
pub mod model;
pub mod servable;
pub mod wire;

pub use compose::{Compose, ItemType};
pub use error::{HintError, SchemaError};
pub use kind::Kind;
pub use model::{ArgumentType, Dimension, Shape, TypeDescriptor};
pub use servable::{Servable, ServableMethod, DEFAULT_METHOD};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn descriptor_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeDescriptor>();
        assert_send_sync::<Servable>();
    }

    #[test]
    fn compose_and_wire_agree() {
        let composed = Compose::new(Kind::Dict, "Record")
            .properties([
                ("a", TypeDescriptor::list(ArgumentType::Integer.into())),
                ("b", ArgumentType::String.into()),
            ])
            .build()
            .unwrap();
        let read = TypeDescriptor::from_json(&json!({
            "type": "dict",
            "description": "Record",
            "properties": {
                "a": {"type": "list", "item_type": "integer"},
                "b": {"type": "string"}
            }
        }))
        .unwrap();
        assert_eq!(composed, read);
    }

    #[test]
    fn every_kind_name_is_covered_by_the_wire_format() {
        for kind in Kind::ALL {
            let doc = match kind {
                Kind::NdArray => json!({"type": "ndarray", "shape": [1]}),
                Kind::List => json!({"type": "list", "item_type": "integer"}),
                Kind::Tuple => json!({"type": "tuple", "element_types": []}),
                Kind::Dict => json!({"type": "dict", "properties": {}}),
                Kind::PythonObject => json!({"type": "python object", "python_type": "a.B"}),
                scalar => json!({ "type": scalar.as_str() }),
            };
            assert_eq!(TypeDescriptor::from_json(&doc).unwrap().kind(), kind);
        }
    }
}
