//! Item type enforcement.
//!
//! The enforcer sits between a container's public mutation surface and
//! its sequence collaborator: every proposed item is checked against
//! the class allow-list before storage sees it. A violation is handled
//! per the active [`Severity`]: rejected, accepted with a warning, or
//! accepted silently.

use crate::class::{ClassError, ContainerClass};
use crate::severity::Severity;
use pyxis_types::{TypeTag, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// The ordered allow-list of types a container accepts.
///
/// Duplicates are permitted and order is preserved; the list is never
/// empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedTypes(Vec<TypeTag>);

impl AllowedTypes {
    /// Build an allow-list, rejecting empty or malformed input.
    pub fn new(tags: Vec<TypeTag>) -> Result<Self, ClassError> {
        if tags.is_empty() {
            return Err(ClassError::NoTypesGiven);
        }
        for tag in &tags {
            tag.validate().map_err(ClassError::InvalidTypeArgument)?;
        }
        Ok(Self(tags))
    }

    pub fn tags(&self) -> &[TypeTag] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when `value` conforms to at least one allowed type.
    pub fn admits(&self, value: &Value) -> bool {
        self.0.iter().any(|tag| value.conforms_to(tag))
    }

    /// The diagnostic phrase for this allow-list: a single type renders
    /// as its name, multiple as "one of [a, b, ...]" (the full list,
    /// never elided).
    pub fn describe(&self) -> String {
        if self.0.len() == 1 {
            self.0[0].to_string()
        } else {
            let names: Vec<String> = self.0.iter().map(|t| t.to_string()).collect();
            format!("one of [{}]", names.join(", "))
        }
    }
}

impl fmt::Display for AllowedTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A runtime item type violation - a proposed item does not conform to
/// the container's allow-list.
///
/// Doubles as the fatal error under `raise` severity and as the warning
/// record under `warn` severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeViolation {
    /// Name of the container class whose allow-list was violated
    pub class_name: String,

    /// Rendered allow-list phrase (what was expected)
    pub expected: String,

    /// Index the item was proposed at
    pub index: usize,

    /// Actual runtime type of the offending item
    pub actual: TypeTag,
}

impl TypeViolation {
    fn new(class: &ContainerClass, index: usize, value: &Value) -> Self {
        Self {
            class_name: class.name().to_string(),
            expected: class.allowed().describe(),
            index,
            actual: value.type_tag(),
        }
    }

    /// The suppression key for duplicate warnings: identical class,
    /// allow-list and actual type collapse to one diagnostic per call,
    /// regardless of index.
    fn dedup_key(&self) -> (String, String, String) {
        (
            self.class_name.clone(),
            self.expected.clone(),
            self.actual.to_string(),
        )
    }
}

impl fmt::Display for TypeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "items in container class '{}' must derive from {}; item {} is of type '{}'",
            self.class_name, self.expected, self.index, self.actual
        )
    }
}

impl std::error::Error for TypeViolation {}

/// Outcome of a single type check that did not abort.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// The item conforms (or the violation was silenced)
    Accepted,
    /// The item does not conform but is accepted under `warn`
    AcceptedWithWarning(TypeViolation),
}

/// Per-class type checker.
///
/// Holds the synthesized class (allow-list + severity policy) and
/// validates proposed items against it. Stateless between calls.
#[derive(Debug, Clone)]
pub struct TypeEnforcer {
    class: Arc<ContainerClass>,
}

impl TypeEnforcer {
    pub fn new(class: Arc<ContainerClass>) -> Self {
        Self { class }
    }

    pub fn class(&self) -> &Arc<ContainerClass> {
        &self.class
    }

    /// Check one proposed item.
    ///
    /// Conforming items are always `Accepted`. Non-conforming items are
    /// handled per `action` (falling back to the class's effective
    /// severity): `Silent` accepts without effect, `Warn` accepts and
    /// emits the diagnostic, `Raise` rejects. Checking never mutates
    /// anything, so re-checking the same item is harmless.
    pub fn check_type(
        &self,
        value: &Value,
        index: usize,
        action: Option<Severity>,
    ) -> Result<Check, TypeViolation> {
        if self.class.allowed().admits(value) {
            return Ok(Check::Accepted);
        }

        let severity = action.unwrap_or_else(|| self.class.effective_severity());
        match severity {
            Severity::Silent => Ok(Check::Accepted),
            Severity::Warn => {
                let violation = TypeViolation::new(&self.class, index, value);
                warn!(
                    class = %violation.class_name,
                    index,
                    actual = %violation.actual,
                    "{}", violation
                );
                Ok(Check::AcceptedWithWarning(violation))
            }
            Severity::Raise => Err(TypeViolation::new(&self.class, index, value)),
        }
    }

    /// Wrap an item source in a lazy validating adapter.
    ///
    /// Items are checked as they are pulled, so a downstream
    /// [`Sequence::extend`](crate::storage::Sequence::extend) stores
    /// each accepted item before the next one is even looked at. The
    /// adapter stops at the first rejection; call
    /// [`Validated::finish`] afterwards to collect the outcome.
    pub fn validated<I>(
        &self,
        items: I,
        severity: Severity,
        start_index: usize,
    ) -> Validated<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Value>,
    {
        Validated {
            enforcer: self,
            items: items.into_iter(),
            severity,
            index: start_index,
            seen: HashSet::new(),
            warnings: Vec::new(),
            accepted: 0,
            failure: None,
        }
    }
}

/// Outcome of a bulk validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Number of items accepted (and stored) by this call
    pub accepted: usize,

    /// Deduplicated warnings emitted by this call
    pub warnings: Vec<TypeViolation>,
}

/// Lazy, consume-once stream of validated items.
///
/// Yields each accepted item in order; under `warn` it records
/// deduplicated warnings, under `raise` it stops yielding at the first
/// rejection. The per-call seen-set dies with the adapter.
pub struct Validated<'a, I> {
    enforcer: &'a TypeEnforcer,
    items: I,
    severity: Severity,
    index: usize,
    seen: HashSet<(String, String, String)>,
    warnings: Vec<TypeViolation>,
    accepted: usize,
    failure: Option<TypeViolation>,
}

impl<I> Validated<'_, I> {
    /// Collapse the pass into its outcome: the rejection if one
    /// occurred, otherwise the accepted count and deduplicated
    /// warnings.
    pub fn finish(self) -> Result<ValidationReport, TypeViolation> {
        match self.failure {
            Some(violation) => Err(violation),
            None => Ok(ValidationReport {
                accepted: self.accepted,
                warnings: self.warnings,
            }),
        }
    }
}

impl<I> Iterator for Validated<'_, I>
where
    I: Iterator<Item = Value>,
{
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.failure.is_some() {
            return None;
        }
        let value = self.items.next()?;
        match self
            .enforcer
            .check_type(&value, self.index, Some(self.severity))
        {
            Ok(Check::Accepted) => {}
            Ok(Check::AcceptedWithWarning(violation)) => {
                if self.seen.insert(violation.dedup_key()) {
                    self.warnings.push(violation);
                }
            }
            Err(violation) => {
                self.failure = Some(violation);
                return None;
            }
        }
        self.index += 1;
        self.accepted += 1;
        Some(value)
    }
}

impl<I> fmt::Debug for Validated<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validated")
            .field("class", &self.enforcer.class().name())
            .field("severity", &self.severity)
            .field("index", &self.index)
            .field("accepted", &self.accepted)
            .field("failed", &self.failure.is_some())
            .finish()
    }
}
