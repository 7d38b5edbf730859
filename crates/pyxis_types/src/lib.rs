//! Canonical runtime types for pyxis containers.
//!
//! This crate is the single source of truth for the dynamic type system
//! the container crates enforce against:
//!
//! - [`TypeTag`]: a runtime type descriptor with an explicit, checkable
//!   subtype relation (built-in hierarchy plus user-declared nominal
//!   types).
//! - [`Value`]: the dynamic item a container holds, each carrying a most
//!   specific tag.
//!
//! Higher layers (the `pyxis` crate) build allow-lists of tags and check
//! values against them. Nothing in this crate knows about containers,
//! severities, or storage.

pub mod tag;
pub mod value;

pub use tag::TypeTag;
pub use value::Value;
