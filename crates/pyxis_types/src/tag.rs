//! Runtime type descriptors and the subtype relation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical runtime type descriptor - the SINGLE SOURCE OF TRUTH for
/// item types.
///
/// Built-in tags form a small fixed hierarchy:
///
/// ```text
/// Any
/// ├── Boolean
/// ├── Number
/// │   ├── Integer
/// │   └── Float
/// ├── Text
/// ├── Bytes
/// └── List
/// ```
///
/// [`TypeTag::Custom`] extends the hierarchy with user-declared nominal
/// types: each custom tag names its parent, so arbitrary-depth chains
/// can be built (`EventId` -> `Integer` -> `Number` -> `Any`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// Top of the hierarchy - every value conforms
    Any,

    /// Boolean (true/false)
    Boolean,

    /// 64-bit signed integer
    Integer,

    /// 64-bit floating point
    Float,

    /// Abstract supertype of Integer and Float
    Number,

    /// UTF-8 string (default/fallback)
    #[default]
    Text,

    /// Binary data (raw bytes)
    Bytes,

    /// Nested list of values
    List,

    /// User-declared nominal type with an explicit parent
    Custom { name: String, parent: Box<TypeTag> },
}

impl TypeTag {
    /// Declare a custom type tag as a subtype of `parent`.
    pub fn custom(name: impl Into<String>, parent: TypeTag) -> Self {
        TypeTag::Custom {
            name: name.into(),
            parent: Box::new(parent),
        }
    }

    /// The display name of this tag.
    pub fn name(&self) -> &str {
        match self {
            TypeTag::Any => "any",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Number => "number",
            TypeTag::Text => "text",
            TypeTag::Bytes => "bytes",
            TypeTag::List => "list",
            TypeTag::Custom { name, .. } => name,
        }
    }

    /// The immediate supertype of this tag. `Any` has none.
    pub fn parent(&self) -> Option<&TypeTag> {
        match self {
            TypeTag::Any => None,
            TypeTag::Integer | TypeTag::Float => Some(&TypeTag::Number),
            TypeTag::Custom { parent, .. } => Some(parent),
            _ => Some(&TypeTag::Any),
        }
    }

    /// Reflexive, transitive subtype check: walks the parent chain of
    /// `self` looking for `other`. `Any` is a supertype of everything.
    pub fn is_subtype_of(&self, other: &TypeTag) -> bool {
        let mut current = Some(self);
        while let Some(tag) = current {
            if tag == other {
                return true;
            }
            current = tag.parent();
        }
        false
    }

    /// Check that this tag is a well-formed descriptor.
    ///
    /// Custom tags must carry a non-empty name, at every level of the
    /// parent chain.
    pub fn validate(&self) -> Result<(), String> {
        let mut current = Some(self);
        while let Some(tag) = current {
            if let TypeTag::Custom { name, .. } = tag {
                if name.trim().is_empty() {
                    return Err("custom type tags must have a non-empty name".to_string());
                }
            }
            current = tag.parent();
        }
        Ok(())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(TypeTag::Any),
            "boolean" => Ok(TypeTag::Boolean),
            "integer" => Ok(TypeTag::Integer),
            "float" => Ok(TypeTag::Float),
            "number" => Ok(TypeTag::Number),
            "text" => Ok(TypeTag::Text),
            "bytes" => Ok(TypeTag::Bytes),
            "list" => Ok(TypeTag::List),
            _ => Err(format!(
                "Invalid type tag: '{}'. Expected: any, boolean, integer, float, number, text, bytes, or list",
                s
            )),
        }
    }
}
