//! Type-enforced list containers
//!
//! # Philosophy: the allow-list is a contract
//!
//! A container class declares, once, which item types it accepts. From
//! then on every item entering an instance - at construction, via
//! `append`, via `extend` - is checked against that allow-list before
//! storage ever sees it. There is no coercion and no guessing: a
//! non-conforming item is rejected, or (if the class is configured
//! that way) accepted with an explicit diagnostic.
//!
//! The lifecycle:
//!
//! 1. **Declaration**: a [`ClassSpec`] lists the bases - allow-lists,
//!    ancestor classes, a storage capability
//! 2. **Synthesis**: [`ClassSpec::build`] consolidates allow-lists
//!    across the bases (derived classes may only narrow, never widen),
//!    resolves storage, and produces the [`ContainerClass`]
//! 3. **Enforcement**: instances ([`TypedList`]) validate every
//!    proposed item per the class's [`Severity`] policy
//!
//! # Modules
//!
//! - [`class`]: class synthesis - the base scan, the narrowing rule,
//!   storage resolution
//! - [`enforce`]: per-item checking, violations, the lazy validating
//!   iterator
//! - [`severity`]: the raise/warn/silent policy and per-call overrides
//! - [`storage`]: the sequence collaborator seam
//! - [`container`]: the list instances themselves

pub mod class;
pub mod container;
pub mod enforce;
pub mod severity;
pub mod storage;

pub use class::{Base, ClassError, ClassSpec, ContainerClass};
pub use container::TypedList;
pub use enforce::{AllowedTypes, Check, TypeEnforcer, TypeViolation, Validated, ValidationReport};
pub use severity::{Severity, SeverityOverride};
pub use storage::{Sequence, StorageKind, VecStorage};

// Re-export the canonical type system for convenience
pub use pyxis_types::{TypeTag, Value};
