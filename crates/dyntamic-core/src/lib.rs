//! # dyntamic-core: Foundational Types
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace: the input schema model, the primitive type map, the compiled
//! model descriptor, and the compilation error taxonomy. It depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Schemas are read-only input.** [`Schema`] and [`FieldSpec`] are
//!    parsed once from a `serde_json::Value` and never mutated by the
//!    compiler.
//!
//! 2. **Descriptors are data, not types.** A compiled model is a
//!    [`ModelDescriptor`] value: an ordered list of [`CompiledField`]s whose
//!    [`ValueKind`] may own a nested descriptor outright. A generic
//!    validator/serializer walks it at runtime.
//!
//! 3. **Unknown type names are errors.** [`primitive_kind`] returns `None`
//!    for unrecognised names and callers surface
//!    [`SchemaError::UnknownPrimitiveType`]. Nothing defaults silently.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dyntamic-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod kind;
pub mod schema;

// Re-export primary types for ergonomic imports.
pub use descriptor::{CompiledField, ModelDescriptor, ValueKind};
pub use error::SchemaError;
pub use kind::{primitive_kind, PrimitiveKind, UnknownTypeName};
pub use schema::{FieldShape, FieldSpec, Property, Schema, DEFAULT_REF_PREFIX};
