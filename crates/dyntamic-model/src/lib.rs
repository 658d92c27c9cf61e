//! # dyntamic-model: Validation & Serialization
//!
//! The runtime half of dyntamic. A compiled
//! [`ModelDescriptor`](dyntamic_core::ModelDescriptor) is data; this crate
//! walks it generically:
//!
//! - [`payload_schema`] renders the descriptor as a draft 2020-12 JSON
//!   Schema for its payloads.
//! - [`ModelValidator`] runs that schema through `jsonschema` and turns
//!   arbitrary JSON into an [`Instance`], or into a [`ValidationError`]
//!   listing every per-field [`Violation`] with its JSON Pointer path.
//! - [`Instance`] serializes back to canonical JSON keyed by field alias.
//!
//! ## Crate Policy
//!
//! - Depends only on `dyntamic-core` internally.
//! - Validation collects all violations; it never stops at the first.

pub mod instance;
pub mod payload_schema;
pub mod validate;

pub use instance::{FieldValue, Instance, InstanceField, SerializeOptions};
pub use payload_schema::payload_schema;
pub use validate::{ModelValidator, ValidationError, ValidationViolations, Violation};
