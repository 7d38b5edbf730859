//! The sequence collaborator - ordered, mutable storage for validated
//! items.
//!
//! Containers never store items directly; they hand validated values to
//! a [`Sequence`] implementation. Everything a container is not (rich
//! list behavior, growth strategy) lives behind this seam.

use pyxis_types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered, mutable storage onto which validated items are stored.
///
/// `extend` consumes the iterator item-by-item, so a validating adapter
/// upstream interleaves checking with storage.
pub trait Sequence: fmt::Debug {
    /// Store one value at the end.
    fn append(&mut self, value: Value);

    /// Store every value the iterator yields, in order.
    fn extend(&mut self, values: &mut dyn Iterator<Item = Value>);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&Value>;

    fn as_slice(&self) -> &[Value];
}

/// Default sequence collaborator backed by a `Vec`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VecStorage {
    items: Vec<Value>,
}

impl VecStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sequence for VecStorage {
    fn append(&mut self, value: Value) {
        self.items.push(value);
    }

    fn extend(&mut self, values: &mut dyn Iterator<Item = Value>) {
        self.items.extend(values);
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

/// Which sequence collaborator a synthesized class instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// In-memory `Vec`-backed storage (default)
    #[default]
    Vec,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Vec => "vec",
        }
    }

    /// Create a fresh collaborator of this kind for a new instance.
    pub fn instantiate(&self) -> Box<dyn Sequence> {
        match self {
            StorageKind::Vec => Box::new(VecStorage::new()),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vec" => Ok(StorageKind::Vec),
            _ => Err(format!("Invalid storage kind: '{}'. Expected: vec", s)),
        }
    }
}
