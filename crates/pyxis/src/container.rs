//! Container instances.
//!
//! A [`TypedList`] owns a validator and a storage collaborator and
//! calls them in that literal order: every mutation path runs the type
//! check first, then delegates to storage. There is no other route
//! into storage.

use crate::class::ContainerClass;
use crate::enforce::{Check, TypeEnforcer, TypeViolation, ValidationReport};
use crate::severity::{Severity, SeverityOverride};
use crate::storage::Sequence;
use pyxis_types::Value;
use std::sync::Arc;

/// An instance of a synthesized container class: a dynamic list that
/// only holds items conforming to the class allow-list.
#[derive(Debug)]
pub struct TypedList {
    class: Arc<ContainerClass>,
    enforcer: TypeEnforcer,
    storage: Box<dyn Sequence>,
}

impl ContainerClass {
    /// Construct an instance of this class from an iterable.
    ///
    /// Equivalent to [`TypedList::new`].
    pub fn instantiate(
        self: &Arc<Self>,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<TypedList, TypeViolation> {
        TypedList::new(self, items)
    }
}

impl TypedList {
    /// An empty instance of `class`.
    pub fn empty(class: &Arc<ContainerClass>) -> Self {
        Self {
            class: Arc::clone(class),
            enforcer: TypeEnforcer::new(Arc::clone(class)),
            storage: class.storage_kind().instantiate(),
        }
    }

    /// Construct from an iterable, validating each item under the
    /// class's effective severity. Under `raise`, the first
    /// non-conforming item aborts construction and no instance is
    /// produced; under `warn`/`silent` every item is stored.
    pub fn new(
        class: &Arc<ContainerClass>,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<Self, TypeViolation> {
        let mut list = Self::empty(class);
        list.extend(items)?;
        Ok(list)
    }

    /// Construct from an iterable with explicit per-call severity
    /// flags, returning the instance together with the validation
    /// report.
    pub fn with_severity(
        class: &Arc<ContainerClass>,
        items: impl IntoIterator<Item = Value>,
        flags: SeverityOverride,
    ) -> Result<(Self, ValidationReport), TypeViolation> {
        let mut list = Self::empty(class);
        let report = list.extend_with(items, flags)?;
        Ok((list, report))
    }

    pub fn class(&self) -> &Arc<ContainerClass> {
        &self.class
    }

    pub fn enforcer(&self) -> &TypeEnforcer {
        &self.enforcer
    }

    /// Validate one item and store it.
    ///
    /// `Ok(None)`: accepted. `Ok(Some(violation))`: accepted with a
    /// warning under `warn` severity - the item IS stored. `Err`:
    /// rejected under `raise` severity - nothing is stored.
    pub fn append(&mut self, value: Value) -> Result<Option<TypeViolation>, TypeViolation> {
        match self.enforcer.check_type(&value, self.storage.len(), None)? {
            Check::Accepted => {
                self.storage.append(value);
                Ok(None)
            }
            Check::AcceptedWithWarning(violation) => {
                self.storage.append(value);
                Ok(Some(violation))
            }
        }
    }

    /// Validate and store a stream of items under the class's
    /// effective severity.
    ///
    /// Validation is interleaved with storage item-by-item: under
    /// `raise`, a rejection aborts the call, but items already yielded
    /// to storage remain.
    pub fn extend(
        &mut self,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<ValidationReport, TypeViolation> {
        let severity = self.class.effective_severity();
        self.extend_inner(items, severity)
    }

    /// [`TypedList::extend`] with explicit per-call severity flags
    /// (first-true-wins; raising when none is set).
    pub fn extend_with(
        &mut self,
        items: impl IntoIterator<Item = Value>,
        flags: SeverityOverride,
    ) -> Result<ValidationReport, TypeViolation> {
        self.extend_inner(items, flags.resolve())
    }

    fn extend_inner(
        &mut self,
        items: impl IntoIterator<Item = Value>,
        severity: Severity,
    ) -> Result<ValidationReport, TypeViolation> {
        let mut validated = self
            .enforcer
            .validated(items, severity, self.storage.len());
        self.storage.extend(&mut validated);
        validated.finish()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.storage.get(index)
    }

    pub fn items(&self) -> &[Value] {
        self.storage.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.storage.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a TypedList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
