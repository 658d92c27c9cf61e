//! # Payload Schema
//!
//! Renders a [`ModelDescriptor`] as a self-contained draft 2020-12 JSON
//! Schema describing the payloads it accepts. Nested models are inlined,
//! so the result carries no `$ref` and needs no resolver.
//!
//! Properties are keyed by alias. An optional field also admits `null`,
//! which the validator treats the same as an omitted key. Undeclared keys
//! are allowed.

use dyntamic_core::{CompiledField, ModelDescriptor, PrimitiveKind, ValueKind};
use serde_json::{json, Map, Value};

/// The JSON Schema a payload for `model` must satisfy.
pub fn payload_schema(model: &ModelDescriptor) -> Value {
    let mut schema = object_schema(model);
    if let Value::Object(obj) = &mut schema {
        obj.insert(
            "$schema".into(),
            Value::String("https://json-schema.org/draft/2020-12/schema".into()),
        );
        obj.insert("title".into(), Value::String(model.name.clone()));
    }
    schema
}

fn object_schema(model: &ModelDescriptor) -> Value {
    let required: Vec<Value> = model
        .required_fields()
        .map(|f| Value::String(f.alias.clone()))
        .collect();
    let properties: Map<String, Value> = model
        .fields
        .iter()
        .map(|f| (f.alias.clone(), field_schema(f)))
        .collect();

    // `required` before `properties`: a missing key is reported before the
    // problems inside its siblings.
    let mut obj = Map::new();
    obj.insert("type".into(), json!("object"));
    if !required.is_empty() {
        obj.insert("required".into(), Value::Array(required));
    }
    obj.insert("properties".into(), Value::Object(properties));
    Value::Object(obj)
}

fn field_schema(field: &CompiledField) -> Value {
    let mut schema = kind_schema(&field.kind);
    if field.is_optional() {
        if let Some(Value::String(ty)) = schema.get("type").cloned() {
            schema["type"] = json!([ty, "null"]);
        }
    }
    schema
}

fn kind_schema(kind: &ValueKind) -> Value {
    match kind {
        ValueKind::Primitive(primitive) => json!({ "type": json_type_name(*primitive) }),
        ValueKind::Model(model) => object_schema(model),
        ValueKind::List(inner) => json!({ "type": "array", "items": kind_schema(inner) }),
    }
}

fn json_type_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Text => "string",
        PrimitiveKind::List => "array",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Integer => "integer",
        PrimitiveKind::Float => "number",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, kind: ValueKind, required: bool) -> CompiledField {
        CompiledField {
            name: name.into(),
            alias: name.into(),
            kind,
            required,
            title: None,
            description: None,
        }
    }

    #[test]
    fn optional_fields_admit_null() {
        let model = ModelDescriptor {
            name: "Person".into(),
            base: None,
            fields: vec![
                field("name", ValueKind::Primitive(PrimitiveKind::Text), true),
                field("age", ValueKind::Primitive(PrimitiveKind::Integer), false),
            ],
        };
        let schema = payload_schema(&model);
        assert_eq!(schema["title"], "Person");
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["name"]["type"], "string");
        assert_eq!(schema["properties"]["age"]["type"], json!(["integer", "null"]));
    }

    #[test]
    fn nested_models_are_inlined() {
        let member = ModelDescriptor {
            name: "Member".into(),
            base: None,
            fields: vec![field("id", ValueKind::Primitive(PrimitiveKind::Integer), true)],
        };
        let model = ModelDescriptor {
            name: "Team".into(),
            base: None,
            fields: vec![
                field("lead", ValueKind::Model(member.clone()), false),
                field(
                    "members",
                    ValueKind::List(Box::new(ValueKind::Model(member))),
                    true,
                ),
            ],
        };
        let schema = payload_schema(&model);
        assert_eq!(schema["properties"]["lead"]["type"], json!(["object", "null"]));
        assert_eq!(schema["properties"]["lead"]["required"], json!(["id"]));
        assert_eq!(schema["properties"]["members"]["items"]["type"], "object");
        assert!(!schema.to_string().contains("$ref"));
    }

    #[test]
    fn model_without_required_fields_omits_required() {
        let model = ModelDescriptor {
            name: "Loose".into(),
            base: None,
            fields: vec![field("x", ValueKind::Primitive(PrimitiveKind::Float), false)],
        };
        let schema = payload_schema(&model);
        assert!(schema.get("required").is_none());
        assert_eq!(schema["properties"]["x"]["type"], json!(["number", "null"]));
    }
}
