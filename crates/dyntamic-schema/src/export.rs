//! # Descriptor Export
//!
//! Dumps a compiled [`ModelDescriptor`] back to the schema subset, with
//! every nested descriptor flattened into `$defs` under its model name.
//! Compiling the result gives back a descriptor equal to the input, except
//! for `base`, which the schema subset cannot express.

use dyntamic_core::{CompiledField, FieldSpec, ModelDescriptor, PrimitiveKind, Schema, ValueKind};
use serde_json::Value;

use crate::resolve::ReferenceResolver;

/// Rebuild a [`Schema`] from a descriptor.
pub fn to_schema(model: &ModelDescriptor, ref_prefix: &str) -> Schema {
    let resolver = ReferenceResolver::new(ref_prefix);
    let mut root = Schema::new(&model.name);
    let mut pending: Vec<&ModelDescriptor> = Vec::new();

    root = model_properties(root, model, &resolver, &mut pending);

    while let Some(nested) = pending.pop() {
        if root.definitions.contains_key(&nested.name) {
            continue;
        }
        let definition = model_properties(Schema::new(&nested.name), nested, &resolver, &mut pending);
        root.definitions.insert(nested.name.clone(), definition);
    }
    root
}

/// Rebuild the schema as a JSON value.
pub fn to_json_schema(model: &ModelDescriptor, ref_prefix: &str) -> Value {
    to_schema(model, ref_prefix).to_value()
}

fn model_properties<'m>(
    mut schema: Schema,
    model: &'m ModelDescriptor,
    resolver: &ReferenceResolver<'_>,
    pending: &mut Vec<&'m ModelDescriptor>,
) -> Schema {
    for field in &model.fields {
        let spec = field_spec(field, &field.kind, resolver, pending);
        schema = schema.with_property(field.name.clone(), spec, field.required);
    }
    schema
}

fn field_spec<'m>(
    field: &CompiledField,
    kind: &'m ValueKind,
    resolver: &ReferenceResolver<'_>,
    pending: &mut Vec<&'m ModelDescriptor>,
) -> FieldSpec {
    let mut spec = kind_spec(kind, resolver, pending);
    spec.title = field.title.clone();
    spec.description = field.description.clone();
    spec
}

fn kind_spec<'m>(
    kind: &'m ValueKind,
    resolver: &ReferenceResolver<'_>,
    pending: &mut Vec<&'m ModelDescriptor>,
) -> FieldSpec {
    match kind {
        ValueKind::Primitive(PrimitiveKind::List) => FieldSpec::array(None),
        ValueKind::Primitive(primitive) => FieldSpec::primitive(primitive.schema_name()),
        ValueKind::Model(model) => {
            pending.push(model);
            FieldSpec::reference(resolver.pointer_for(&model.name))
        }
        ValueKind::List(inner) => FieldSpec::array(Some(kind_spec(inner, resolver, pending))),
    }
}
