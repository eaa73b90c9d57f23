//! Servable method metadata.
//!
//! A published servable document carries a `servable` block whose `methods`
//! map each callable name to its input and output descriptors:
//!
//! ```text
//! {"servable": {"methods": {"run": {"input": {...}, "output": {...},
//!                                   "parameters": {}, "method_details": {}}},
//!               "shim": "python.PythonStaticMethodServable",
//!               "type": "Python static method"}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::kind::Kind;
use crate::model::TypeDescriptor;

/// Name of the method every servable exposes.
pub const DEFAULT_METHOD: &str = "run";

/// One callable method of a servable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServableMethod {
    /// Descriptor of the accepted input.
    pub input: TypeDescriptor,
    /// Descriptor of the produced output.
    pub output: TypeDescriptor,
    /// Additional arguments and their default values.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Options used to construct the shim that runs the method.
    #[serde(default)]
    pub method_details: Map<String, Value>,
}

impl ServableMethod {
    /// Creates a method with no parameters or details.
    #[must_use]
    pub fn new(input: TypeDescriptor, output: TypeDescriptor) -> Self {
        Self {
            input,
            output,
            parameters: Map::new(),
            method_details: Map::new(),
        }
    }

    /// Marks whether inputs are unpacked into positional arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] unless the input is a `list` or
    /// `tuple`; only sequences can be unpacked.
    pub fn set_unpack(&mut self, unpack: bool) -> Result<()> {
        if !matches!(self.input.kind(), Kind::List | Kind::Tuple) {
            return Err(SchemaError::InvalidField {
                field: "unpack",
                reason: format!(
                    "only list and tuple inputs can be unpacked, input is {}",
                    self.input.kind()
                ),
            });
        }
        self.method_details
            .insert("unpack".to_owned(), Value::Bool(unpack));
        Ok(())
    }

    /// Returns true if inputs are unpacked before the call.
    #[must_use]
    pub fn unpacks(&self) -> bool {
        self.method_details
            .get("unpack")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// The `servable` block of a published document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Servable {
    /// Callable methods by name.
    #[serde(default)]
    pub methods: BTreeMap<String, ServableMethod>,
    /// Shim class that executes the servable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shim: Option<String>,
    /// Human-friendly servable type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub servable_type: Option<String>,
}

impl Servable {
    /// Reads a servable from either a whole published document (with a
    /// top-level `servable` key) or the `servable` block itself.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidField`] if the block is malformed or any
    /// method descriptor fails to parse.
    pub fn from_document(document: &Value) -> Result<Self> {
        let block = document.get("servable").unwrap_or(document);
        serde_json::from_value(block.clone()).map_err(|e| SchemaError::InvalidField {
            field: "servable",
            reason: e.to_string(),
        })
    }

    /// Adds or replaces a method.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        method: ServableMethod,
    ) -> &mut Self {
        self.methods.insert(name.into(), method);
        self
    }

    /// Looks up a method by name. Returns `None` if not found.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&ServableMethod> {
        self.methods.get(name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::ArgumentType;

    fn document() -> Value {
        json!({
            "dlhub": {"name": "multiply"},
            "servable": {
                "shim": "python.PythonStaticMethodServable",
                "type": "Python static method",
                "methods": {
                    "run": {
                        "input": {"type": "list", "description": "numbers",
                                  "item_type": {"type": "float"}},
                        "output": {"type": "float", "description": "product"},
                        "parameters": {"scale": 1.0},
                        "method_details": {"module": "math", "method_name": "prod"}
                    }
                }
            }
        })
    }

    #[test]
    fn reads_whole_documents_and_blocks() {
        let doc = document();
        let whole = Servable::from_document(&doc).unwrap();
        let block = Servable::from_document(&doc["servable"]).unwrap();
        assert_eq!(whole, block);
        let run = whole.method(DEFAULT_METHOD).unwrap();
        assert_eq!(run.input.kind(), Kind::List);
        assert_eq!(run.parameters.get("scale"), Some(&json!(1.0)));
        assert_eq!(whole.shim.as_deref(), Some("python.PythonStaticMethodServable"));
    }

    #[test]
    fn malformed_method_is_reported() {
        let doc = json!({"methods": {"run": {"input": {"type": "list"}, "output": {"type": "float"}}}});
        assert!(matches!(
            Servable::from_document(&doc),
            Err(SchemaError::InvalidField { field: "servable", .. })
        ));
    }

    #[test]
    fn unpack_only_for_sequences() {
        let mut method = ServableMethod::new(
            TypeDescriptor::list(ArgumentType::Float.into()),
            ArgumentType::Float.into(),
        );
        method.set_unpack(true).unwrap();
        assert!(method.unpacks());

        let mut scalar = ServableMethod::new(ArgumentType::Float.into(), ArgumentType::Float.into());
        assert!(scalar.set_unpack(true).is_err());
        assert!(!scalar.unpacks());
    }

    #[test]
    fn register_and_serialize() {
        let mut servable = Servable::default();
        servable.register_function(
            DEFAULT_METHOD,
            ServableMethod::new(ArgumentType::String.into(), ArgumentType::Integer.into()),
        );
        let value = serde_json::to_value(&servable).unwrap();
        assert_eq!(value["methods"]["run"]["input"]["type"], json!("string"));
        assert_eq!(Servable::from_document(&value).unwrap(), servable);
    }
}
