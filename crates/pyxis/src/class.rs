//! Container class synthesis.
//!
//! A container class is built once, at configuration time, from a list
//! of declared bases: enforcement capabilities (allow-lists), existing
//! container classes (derivation), and a sequence-storage capability.
//! The builder consolidates allow-lists across the bases, applies the
//! narrowing rule, and returns the finalized class.
//!
//! # Narrowing
//!
//! A derived class may only tighten its ancestors' restrictions: every
//! inherited allowed type must be matched by some requested type that
//! is its subtype. Requesting an unrelated or broader type is a
//! synthesis failure, because it would make enforcement mean different
//! things at different levels of the same hierarchy.

use crate::enforce::AllowedTypes;
use crate::severity::Severity;
use crate::storage::StorageKind;
use pyxis_types::TypeTag;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Sentinel level meaning "no class-level severity set; inherit".
const SEVERITY_UNSET: i8 = i8::MIN;

/// Errors that can occur during class synthesis.
///
/// All of these are fatal at configuration time; no class object is
/// produced.
#[derive(Debug, Error)]
pub enum ClassError {
    /// The factory was invoked without any allowed type.
    #[error("a type-enforced container requires at least one allowed type")]
    NoTypesGiven,

    /// An argument to the factory was not a usable type descriptor.
    #[error("invalid type argument: {0}")]
    InvalidTypeArgument(String),

    /// The allow-lists established at different levels of the
    /// hierarchy share no subtype relationship.
    #[error(
        "incompatible type restrictions ({requested}, {inherited}) requested in different bases \
         of container class '{class_name}'"
    )]
    IncompatibleRestrictions {
        class_name: String,
        requested: TypeTag,
        inherited: TypeTag,
    },

    /// Type enforcement was requested without any sequence base.
    #[error(
        "class '{class_name}' requests type enforcement without a sequence base; \
         use ClassSpec::list_of to build a full container"
    )]
    MissingStorage { class_name: String },
}

/// A synthesized container class.
///
/// Created once by [`ClassSpec::build`] and shared by every instance
/// via `Arc`. Immutable after synthesis except for the class-level
/// severity setting.
#[derive(Debug)]
pub struct ContainerClass {
    class_id: Uuid,
    name: String,
    allowed: AllowedTypes,
    parent: Option<Arc<ContainerClass>>,
    storage: StorageKind,
    /// Severity level, or SEVERITY_UNSET when inheriting
    severity: AtomicI8,
}

impl ContainerClass {
    /// Synthesize a full container class from scratch: the canonical
    /// "list of these types" form, with default storage injected.
    pub fn list_of(
        name: impl Into<String>,
        tags: Vec<TypeTag>,
    ) -> Result<Arc<Self>, ClassError> {
        ClassSpec::list_of(name, tags)?.build()
    }

    pub fn class_id(&self) -> Uuid {
        self.class_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allowed(&self) -> &AllowedTypes {
        &self.allowed
    }

    pub fn parent(&self) -> Option<&Arc<ContainerClass>> {
        self.parent.as_ref()
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage
    }

    /// Set the class-level enforcement severity.
    ///
    /// Affects every subsequent default-mode validation for this class
    /// and for subclasses that have not set their own.
    pub fn set_severity(&self, severity: Severity) {
        self.severity.store(severity.as_level(), Ordering::Relaxed);
    }

    /// This class's own severity setting, if any.
    pub fn own_severity(&self) -> Option<Severity> {
        Severity::from_level(self.severity.load(Ordering::Relaxed)).ok()
    }

    /// The severity in force for default-mode validations: this
    /// class's setting, else the nearest ancestor's, else `Raise`.
    pub fn effective_severity(&self) -> Severity {
        if let Some(severity) = self.own_severity() {
            return severity;
        }
        match &self.parent {
            Some(parent) => parent.effective_severity(),
            None => Severity::default(),
        }
    }
}

/// A declared base of a container class under construction.
#[derive(Debug, Clone)]
pub enum Base {
    /// Derive from an existing container class, inheriting its
    /// allow-list, storage and severity chain.
    Class(Arc<ContainerClass>),

    /// A type-enforcement capability: the allow-list requested at this
    /// level.
    Enforcer(AllowedTypes),

    /// A sequence-storage capability.
    Storage(StorageKind),
}

/// Builder for container classes - the declared base list.
///
/// ```
/// use pyxis::class::{ClassSpec, ContainerClass};
/// use pyxis_types::TypeTag;
///
/// let ints = ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();
///
/// // Derive and narrow: integer is re-stated, so this synthesizes.
/// let narrowed = ClassSpec::new("EventIds")
///     .derive_from(&ints)
///     .of_types(vec![TypeTag::custom("event_id", TypeTag::Integer)])
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(narrowed.name(), "EventIds");
/// ```
#[derive(Debug, Clone)]
pub struct ClassSpec {
    name: String,
    bases: Vec<Base>,
    implicit_storage: bool,
}

impl ClassSpec {
    /// Start a class declaration with no implicit storage: the
    /// enforcement-only form, which requires a sequence base (a
    /// [`Base::Storage`] or an ancestor class) by build time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            implicit_storage: false,
        }
    }

    /// Start the canonical full-container declaration: the requested
    /// types are validated immediately, and default storage is
    /// injected at build time if no sequence base appears.
    pub fn list_of(name: impl Into<String>, tags: Vec<TypeTag>) -> Result<Self, ClassError> {
        let mut spec = Self::new(name);
        spec.implicit_storage = true;
        spec.bases.push(Base::Enforcer(AllowedTypes::new(tags)?));
        Ok(spec)
    }

    /// Add a declared base.
    pub fn base(mut self, base: Base) -> Self {
        self.bases.push(base);
        self
    }

    /// Request an allow-list at this level. Fails immediately on an
    /// empty or malformed type list.
    pub fn of_types(mut self, tags: Vec<TypeTag>) -> Result<Self, ClassError> {
        self.bases.push(Base::Enforcer(AllowedTypes::new(tags)?));
        Ok(self)
    }

    /// Derive from an existing container class.
    pub fn derive_from(mut self, parent: &Arc<ContainerClass>) -> Self {
        self.bases.push(Base::Class(Arc::clone(parent)));
        self
    }

    /// Declare a sequence-storage capability.
    pub fn storage(mut self, kind: StorageKind) -> Self {
        self.bases.push(Base::Storage(kind));
        self
    }

    /// Synthesize the class.
    ///
    /// Scans the declared bases in order, consolidates requested and
    /// inherited allow-lists, applies the narrowing rule, resolves the
    /// storage capability, and returns the finished class. Instance
    /// operations always run the type check before storage, by
    /// construction rather than by base ordering.
    pub fn build(self) -> Result<Arc<ContainerClass>, ClassError> {
        let mut storage: Option<StorageKind> = None;
        let mut requested: Vec<TypeTag> = Vec::new();
        let mut inherited: Vec<TypeTag> = Vec::new();
        let mut parent: Option<Arc<ContainerClass>> = None;

        for base in &self.bases {
            match base {
                Base::Storage(kind) => {
                    if storage.is_none() {
                        storage = Some(*kind);
                    }
                }
                Base::Enforcer(allowed) => {
                    requested.extend(allowed.tags().iter().cloned());
                }
                Base::Class(class) => {
                    // A class base is a sequence capability too; the
                    // first one found wins, same as an explicit
                    // storage base.
                    if storage.is_none() {
                        storage = Some(class.storage_kind());
                    }
                    if parent.is_none() {
                        parent = Some(Arc::clone(class));
                    }
                    // One-level walk: the class's effective allow-list
                    // is what its own enforcer ancestry established.
                    inherited.extend(class.allowed().tags().iter().cloned());
                }
            }
        }

        if let Some(first_requested) = requested.first() {
            for inherited_tag in &inherited {
                let narrows = requested.iter().any(|r| r.is_subtype_of(inherited_tag));
                if !narrows {
                    return Err(ClassError::IncompatibleRestrictions {
                        class_name: self.name,
                        requested: first_requested.clone(),
                        inherited: inherited_tag.clone(),
                    });
                }
            }
        }

        let storage = match storage {
            Some(kind) => kind,
            None if self.implicit_storage => StorageKind::default(),
            None => {
                return Err(ClassError::MissingStorage {
                    class_name: self.name,
                })
            }
        };

        // The new level's types replace the inherited ones once
        // narrowing has been proven.
        let effective = if requested.is_empty() {
            inherited
        } else {
            requested
        };
        let allowed = AllowedTypes::new(effective)?;

        let class = Arc::new(ContainerClass {
            class_id: Uuid::new_v4(),
            name: self.name,
            allowed,
            parent,
            storage,
            severity: AtomicI8::new(SEVERITY_UNSET),
        });

        debug!(
            class = %class.name,
            class_id = %class.class_id,
            allowed = %class.allowed,
            storage = %class.storage,
            "synthesized container class"
        );

        Ok(class)
    }
}
