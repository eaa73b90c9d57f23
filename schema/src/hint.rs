//! Descriptors from Python-style type hints.
//!
//! Servable authors usually annotate the function they publish; these
//! helpers turn the annotation text (`list[int]`, `Tuple[float, str]`,
//! `numpy.ndarray`, ...) into input and output descriptors.
//!
//! ```
//! use dlhub_schema::hint::{signature_to_input, Parameter};
//! use dlhub_schema::Kind;
//!
//! let params = [
//!     Parameter::annotated("a", "float").unwrap(),
//!     Parameter::annotated("b", "float").unwrap(),
//! ];
//! let input = signature_to_input(&params).unwrap();
//! assert_eq!(input.kind(), Kind::Tuple);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::compose::Compose;
use crate::error::HintError;
use crate::kind::Kind;
use crate::model::{Shape, TypeDescriptor};

/// Type name recorded for `None` hints and parameterless functions.
pub const NONE_TYPE: &str = "builtins.NoneType";

/// Deepest generic nesting the hint parser accepts.
pub const MAX_HINT_DEPTH: usize = 64;

/// A parsed type hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// `None`.
    None,
    /// A bare (possibly dotted) type name such as `int` or `pkg.mod.Class`.
    Name(String),
    /// A subscripted generic such as `list[int]` or `Dict[str, float]`.
    Generic {
        /// The outer type name.
        origin: String,
        /// The type arguments, in order.
        args: Vec<TypeHint>,
    },
}

/// Builtin hint spelling recognized after stripping module prefixes.
enum Builtin {
    Int,
    Float,
    Str,
    Bool,
    NdArray,
    List,
    Tuple,
    Dict,
    NoneType,
}

fn builtin(name: &str) -> Option<Builtin> {
    let bare = ["typing.", "builtins.", "numpy.", "np."]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name);
    Some(match bare {
        "int" => Builtin::Int,
        "float" => Builtin::Float,
        "str" => Builtin::Str,
        "bool" => Builtin::Bool,
        "ndarray" => Builtin::NdArray,
        "list" | "List" => Builtin::List,
        "tuple" | "Tuple" => Builtin::Tuple,
        "dict" | "Dict" => Builtin::Dict,
        "NoneType" => Builtin::NoneType,
        _ => return None,
    })
}

impl TypeHint {
    /// Converts this hint into a descriptor with an empty description.
    ///
    /// - `list[T]` becomes a `list` of `T`; `tuple[A, B]` a `tuple`.
    /// - `dict[K, V]` and bare `dict` become a `dict` with no properties, since
    ///   a hint cannot name the accepted keys.
    /// - `ndarray` becomes an `ndarray` of any shape.
    /// - `None` and every unrecognized name become a `python object`.
    ///
    /// # Errors
    ///
    /// Returns [`HintError::MissingElementTypes`] for a bare `list`/`tuple`,
    /// [`HintError::UnknownGeneric`] for other subscripted types, and
    /// [`HintError::Parse`] for a generic with the wrong number of arguments.
    pub fn to_descriptor(&self) -> Result<TypeDescriptor, HintError> {
        let descriptor = match self {
            TypeHint::None => Compose::new(Kind::PythonObject, "").python_type(NONE_TYPE),
            TypeHint::Name(name) => match builtin(name) {
                Some(Builtin::Int) => Compose::new(Kind::Integer, ""),
                Some(Builtin::Float) => Compose::new(Kind::Float, ""),
                Some(Builtin::Str) => Compose::new(Kind::String, ""),
                Some(Builtin::Bool) => Compose::new(Kind::Boolean, ""),
                Some(Builtin::NdArray) => Compose::new(Kind::NdArray, "").shape(Shape::Any),
                Some(Builtin::Dict) => Compose::new(Kind::Dict, "")
                    .properties(std::iter::empty::<(String, TypeDescriptor)>()),
                Some(Builtin::List | Builtin::Tuple) => {
                    return Err(HintError::MissingElementTypes(name.clone()))
                }
                Some(Builtin::NoneType) => {
                    Compose::new(Kind::PythonObject, "").python_type(NONE_TYPE)
                }
                None => Compose::new(Kind::PythonObject, "").python_type(qualify(name)),
            },
            TypeHint::Generic { origin, args } => match builtin(origin) {
                Some(Builtin::List) => {
                    let [item] = args.as_slice() else {
                        return Err(arity(self, "list takes exactly one type argument"));
                    };
                    Compose::new(Kind::List, "").item_type(item.to_descriptor()?)
                }
                Some(Builtin::Tuple) => Compose::new(Kind::Tuple, "").element_types(
                    args.iter()
                        .map(TypeHint::to_descriptor)
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                Some(Builtin::Dict) => {
                    if args.len() != 2 {
                        return Err(arity(self, "dict takes a key and a value type"));
                    }
                    Compose::new(Kind::Dict, "")
                        .properties(std::iter::empty::<(String, TypeDescriptor)>())
                }
                _ => return Err(HintError::UnknownGeneric(origin.clone())),
            },
        };
        Ok(descriptor.build()?)
    }
}

fn arity(hint: &TypeHint, reason: &str) -> HintError {
    HintError::Parse {
        input: hint.to_string(),
        reason: reason.to_owned(),
    }
}

/// Undotted names are builtins, mirroring `type.__module__`.
fn qualify(name: &str) -> String {
    if name.contains('.') {
        name.to_owned()
    } else {
        format!("builtins.{name}")
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::None => f.write_str("None"),
            TypeHint::Name(name) => f.write_str(name),
            TypeHint::Generic { origin, args } => {
                write!(f, "{origin}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl FromStr for TypeHint {
    type Err = HintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            src: s,
            pos: 0,
            depth: 0,
        };
        let hint = parser.hint()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(hint)
    }
}

/// Recursive-descent parser over `name ('[' hint (',' hint)* ']')?`.
struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open generic brackets.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: &str) -> HintError {
        HintError::Parse {
            input: self.src.to_owned(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn name(&mut self) -> Result<&'a str, HintError> {
        let src = self.src;
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
        {
            self.pos += c.len_utf8();
        }
        let name = &src[start..self.pos];
        match name.chars().next() {
            None => Err(self.error("expected a type name")),
            Some(c) if c.is_ascii_digit() || c == '.' => Err(self.error("malformed type name")),
            Some(_) if name.ends_with('.') || name.contains("..") => {
                Err(self.error("malformed type name"))
            }
            Some(_) => Ok(name),
        }
    }

    fn hint(&mut self) -> Result<TypeHint, HintError> {
        let name = self.name()?.to_owned();
        if !self.eat('[') {
            return Ok(if name == "None" {
                TypeHint::None
            } else {
                TypeHint::Name(name)
            });
        }
        if self.depth == MAX_HINT_DEPTH {
            return Err(self.error("type hint nests too deeply"));
        }
        self.depth += 1;
        let mut args = vec![self.hint()?];
        while self.eat(',') {
            args.push(self.hint()?);
        }
        if !self.eat(']') {
            return Err(self.error("expected ',' or ']'"));
        }
        self.depth -= 1;
        Ok(TypeHint::Generic { origin: name, args })
    }
}

/// One parameter of a function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Annotation, if any.
    pub hint: Option<TypeHint>,
}

impl Parameter {
    /// Creates a parameter with an optional annotation.
    #[must_use]
    pub fn new(name: impl Into<String>, hint: Option<TypeHint>) -> Self {
        Self {
            name: name.into(),
            hint,
        }
    }

    /// Creates an annotated parameter from hint text.
    ///
    /// # Errors
    ///
    /// Returns [`HintError::Parse`] if the hint text is malformed.
    pub fn annotated(name: impl Into<String>, hint: &str) -> Result<Self, HintError> {
        Ok(Self::new(name, Some(hint.parse()?)))
    }
}

/// Derives the input descriptor of a function from its parameters.
///
/// No parameters yields a `python object` of `builtins.NoneType`; a single
/// parameter yields its own descriptor; several yield a `tuple`.
///
/// # Errors
///
/// Returns [`HintError::MissingAnnotation`] for an unannotated parameter, or
/// any conversion error from [`TypeHint::to_descriptor`].
pub fn signature_to_input(params: &[Parameter]) -> Result<TypeDescriptor, HintError> {
    let mut descriptors = params
        .iter()
        .map(|p| {
            p.hint
                .as_ref()
                .ok_or_else(|| HintError::MissingAnnotation(p.name.clone()))?
                .to_descriptor()
        })
        .collect::<Result<Vec<_>, _>>()?;

    match descriptors.len() {
        0 => TypeHint::None.to_descriptor(),
        1 => Ok(descriptors.remove(0)),
        _ => Ok(Compose::new(Kind::Tuple, "").element_types(descriptors).build()?),
    }
}

/// Derives the output descriptor of a function from its return annotation.
///
/// # Errors
///
/// Returns [`HintError::MissingReturnAnnotation`] when `returns` is `None`,
/// or any conversion error from [`TypeHint::to_descriptor`].
pub fn signature_to_output(returns: Option<&TypeHint>) -> Result<TypeDescriptor, HintError> {
    returns
        .ok_or(HintError::MissingReturnAnnotation)?
        .to_descriptor()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn describe(hint: &str) -> serde_json::Value {
        hint.parse::<TypeHint>().unwrap().to_descriptor().unwrap().to_json()
    }

    #[test]
    fn parses_nested_generics() {
        let hint: TypeHint = " Dict[str, List[ tuple[int, float] ]] ".parse().unwrap();
        assert_eq!(hint.to_string(), "Dict[str, List[tuple[int, float]]]");
    }

    #[test]
    fn rejects_malformed_hints() {
        for bad in ["", "list[", "list[int", "list[]", "int]", "1abc", "a..b", "list[int,]"] {
            assert!(bad.parse::<TypeHint>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = "list[".repeat(100_000);
        let err = deep.parse::<TypeHint>().unwrap_err();
        let HintError::Parse { reason, .. } = &err else { panic!("{err:?}") };
        assert!(reason.starts_with("type hint nests too deeply"), "{reason}");

        let at_limit = format!(
            "{}int{}",
            "list[".repeat(MAX_HINT_DEPTH),
            "]".repeat(MAX_HINT_DEPTH)
        );
        assert!(at_limit.parse::<TypeHint>().is_ok());
        let over = format!("list[{at_limit}]");
        assert!(over.parse::<TypeHint>().is_err());
    }

    #[test]
    fn list_hint() {
        assert_eq!(
            describe("List[int]"),
            json!({"description": "", "type": "list",
                   "item_type": {"description": "", "type": "integer"}})
        );
    }

    #[test]
    fn tuple_hint() {
        assert_eq!(
            describe("Tuple[int, float]"),
            json!({"description": "", "type": "tuple", "element_types": [
                {"description": "", "type": "integer"},
                {"description": "", "type": "float"}
            ]})
        );
    }

    #[test]
    fn dict_hint_has_open_properties() {
        let expected = json!({"description": "", "type": "dict", "properties": {}});
        assert_eq!(describe("Dict[str, int]"), expected);
        assert_eq!(describe("dict"), expected);
    }

    #[test]
    fn ndarray_hint_has_any_shape() {
        assert_eq!(
            describe("numpy.ndarray"),
            json!({"description": "", "type": "ndarray", "shape": "Any"})
        );
    }

    #[test]
    fn none_and_classes_are_python_objects() {
        assert_eq!(
            describe("None"),
            json!({"description": "", "type": "python object", "python_type": NONE_TYPE})
        );
        assert_eq!(describe("pymatgen.core.Composition")["python_type"], json!("pymatgen.core.Composition"));
        assert_eq!(describe("complex")["python_type"], json!("builtins.complex"));
    }

    #[test]
    fn bare_sequences_need_element_types() {
        assert_eq!(
            "list".parse::<TypeHint>().unwrap().to_descriptor(),
            Err(HintError::MissingElementTypes("list".to_owned()))
        );
        assert!("Tuple".parse::<TypeHint>().unwrap().to_descriptor().is_err());
    }

    #[test]
    fn unknown_generics_fail() {
        assert_eq!(
            "Optional[int]".parse::<TypeHint>().unwrap().to_descriptor(),
            Err(HintError::UnknownGeneric("Optional".to_owned()))
        );
    }

    #[test]
    fn input_from_signature() {
        assert_eq!(signature_to_input(&[]).unwrap().to_json()["python_type"], json!(NONE_TYPE));

        let one = [Parameter::annotated("x", "ndarray").unwrap()];
        assert_eq!(signature_to_input(&one).unwrap().kind(), Kind::NdArray);

        let two = [
            Parameter::annotated("a", "float").unwrap(),
            Parameter::annotated("b", "float").unwrap(),
        ];
        assert_eq!(
            signature_to_input(&two).unwrap().to_json(),
            json!({"description": "", "type": "tuple", "element_types": [
                {"description": "", "type": "float"},
                {"description": "", "type": "float"}
            ]})
        );

        assert_eq!(
            signature_to_input(&[Parameter::new("x", None)]),
            Err(HintError::MissingAnnotation("x".to_owned()))
        );
        assert!(signature_to_input(&[Parameter::annotated("x", "list").unwrap()]).is_err());
    }

    #[test]
    fn output_from_signature() {
        assert_eq!(
            signature_to_output(Some(&TypeHint::None)).unwrap().kind(),
            Kind::PythonObject
        );
        assert_eq!(signature_to_output(None), Err(HintError::MissingReturnAnnotation));
        let bare_list = TypeHint::Name("list".to_owned());
        assert!(signature_to_output(Some(&bare_list)).is_err());
    }
}
