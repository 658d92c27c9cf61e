//! # Field Compilation
//!
//! Builds one [`CompiledField`] from a resolved kind. Required-ness is a
//! membership test against the owning schema's `required` list; the alias
//! is always the field name.

use dyntamic_core::{CompiledField, FieldSpec, ValueKind};

/// Compile one field.
pub fn compile_field(name: &str, kind: ValueKind, required: &[String]) -> CompiledField {
    CompiledField {
        name: name.to_string(),
        alias: name.to_string(),
        kind,
        required: required.iter().any(|r| r == name),
        title: None,
        description: None,
    }
}

/// Copy title and description from the declaration onto a compiled field.
pub fn with_metadata(mut field: CompiledField, spec: &FieldSpec) -> CompiledField {
    field.title = spec.title.clone();
    field.description = spec.description.clone();
    field
}
