//! Dynamic values and their runtime tags.

use crate::tag::TypeTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamic item as held by a container.
///
/// Every value reports a most specific [`TypeTag`] via
/// [`Value::type_tag`]. The [`Value::Tagged`] variant wraps any value
/// with a more specific (usually custom) tag - the moral equivalent of
/// an instance of a user-declared subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    /// A value carrying an explicit tag override
    Tagged { tag: TypeTag, value: Box<Value> },
}

impl Value {
    /// Wrap a value with a more specific tag.
    pub fn tagged(tag: TypeTag, value: Value) -> Self {
        Value::Tagged {
            tag,
            value: Box::new(value),
        }
    }

    /// The most specific runtime tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Integer(_) => TypeTag::Integer,
            Value::Float(_) => TypeTag::Float,
            Value::Text(_) => TypeTag::Text,
            Value::Bytes(_) => TypeTag::Bytes,
            Value::List(_) => TypeTag::List,
            Value::Tagged { tag, .. } => tag.clone(),
        }
    }

    /// Runtime `isinstance` analogue: does this value's tag sit at or
    /// below `tag` in the hierarchy?
    pub fn conforms_to(&self, tag: &TypeTag) -> bool {
        self.type_tag().is_subtype_of(tag)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Tagged { value, .. } => write!(f, "{}", value),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(Value::from(true).type_tag(), TypeTag::Boolean);
        assert_eq!(Value::from(7i64).type_tag(), TypeTag::Integer);
        assert_eq!(Value::from(2.5f64).type_tag(), TypeTag::Float);
        assert_eq!(Value::from("hi").type_tag(), TypeTag::Text);
        assert_eq!(Value::Bytes(vec![1, 2]).type_tag(), TypeTag::Bytes);
        assert_eq!(Value::List(vec![]).type_tag(), TypeTag::List);
    }

    #[test]
    fn test_tagged_overrides_tag() {
        let event_id = TypeTag::custom("event_id", TypeTag::Integer);
        let value = Value::tagged(event_id.clone(), Value::Integer(42));

        assert_eq!(value.type_tag(), event_id);
        assert!(value.conforms_to(&event_id));
        assert!(value.conforms_to(&TypeTag::Integer));
        assert!(value.conforms_to(&TypeTag::Number));
        assert!(!value.conforms_to(&TypeTag::Text));
    }

    #[test]
    fn test_conforms_to_builtins() {
        assert!(Value::from(7i64).conforms_to(&TypeTag::Integer));
        assert!(Value::from(7i64).conforms_to(&TypeTag::Number));
        assert!(Value::from(7i64).conforms_to(&TypeTag::Any));
        assert!(!Value::from(7i64).conforms_to(&TypeTag::Float));
        assert!(!Value::from("x").conforms_to(&TypeTag::Number));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(3i64).to_string(), "3");
        assert_eq!(Value::from("a").to_string(), "'a'");
        let list = Value::List(vec![Value::from(1i64), Value::from(2i64)]);
        assert_eq!(list.to_string(), "[1, 2]");
    }
}
