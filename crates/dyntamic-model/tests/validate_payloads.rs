//! # Payload Validation Against Compiled Schemas
//!
//! Schemas are compiled with `dyntamic-schema`, then payloads are validated
//! and serialized back through the descriptor.

use dyntamic_core::ModelDescriptor;
use dyntamic_model::{ModelValidator, SerializeOptions, ValidationError};
use dyntamic_schema::{json_to_model, SchemaCompiler};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn compile(schema: Value) -> ModelDescriptor {
    SchemaCompiler::new().compile_value(&schema, None).unwrap()
}

fn person() -> ModelDescriptor {
    compile(json!({
        "title": "Person",
        "properties": {
            "name": {"type": "string"},
            "age": {"type": "integer"}
        },
        "required": ["name"]
    }))
}

fn team() -> ModelDescriptor {
    compile(json!({
        "title": "Team",
        "properties": {
            "name": {"type": "string"},
            "lead": {"$ref": "#/$defs/Member"},
            "members": {"type": "array", "items": {"$ref": "#/$defs/Member"}},
            "tags": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["name", "members"],
        "$defs": {
            "Member": {
                "title": "Member",
                "properties": {
                    "id": {"type": "integer"},
                    "email": {"type": "string"},
                    "active": {"type": "boolean"}
                },
                "required": ["id"]
            }
        }
    }))
}

fn violation_paths(err: &ValidationError) -> Vec<String> {
    err.violations()
        .expect("expected violations")
        .violations()
        .iter()
        .map(|v| v.instance_path.clone())
        .collect()
}

#[test]
fn person_accepts_name_only() {
    let instance = ModelValidator::new()
        .validate(&person(), &json!({"name": "Ana"}))
        .unwrap();
    assert!(instance.get("age").unwrap().is_absent());
    assert_eq!(instance.to_value().unwrap(), json!({"name": "Ana", "age": null}));
}

#[test]
fn person_without_name_has_exactly_one_violation() {
    let err = ModelValidator::new()
        .validate(&person(), &json!({"age": 5}))
        .unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.violations()[0].field, "name");
}

#[test]
fn nested_and_listed_models_validate_recursively() {
    let instance = ModelValidator::new()
        .validate(
            &team(),
            &json!({
                "name": "core",
                "lead": {"id": 1, "email": "a@example.com"},
                "members": [{"id": 1}, {"id": 2, "active": true}],
                "tags": ["x", 3, null]
            }),
        )
        .unwrap();

    let lead = instance.get("lead").unwrap().as_model().unwrap();
    assert_eq!(lead.model(), "Member");
    assert_eq!(instance.get("members").unwrap().as_list().unwrap().len(), 2);
    // Untyped list elements pass through unchecked.
    assert_eq!(
        instance.get("tags").unwrap().as_scalar(),
        Some(&json!(["x", 3, null]))
    );
}

#[test]
fn violation_paths_point_into_nested_values() {
    let err = ModelValidator::new()
        .validate(
            &team(),
            &json!({
                "lead": {"email": 5},
                "members": [{"id": 1}, {"id": "two"}, "bogus"]
            }),
        )
        .unwrap_err();
    assert_eq!(
        violation_paths(&err),
        ["/name", "/lead/id", "/lead/email", "/members/1/id", "/members/2"]
    );
}

#[test]
fn serialization_honors_field_order_and_absence() {
    let instance = ModelValidator::new()
        .validate(&team(), &json!({"members": [{"id": 7}], "name": "core"}))
        .unwrap();

    let full = instance.to_value().unwrap();
    let keys: Vec<&String> = full.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["name", "lead", "members", "tags"]);
    assert_eq!(full["members"][0], json!({"id": 7, "email": null, "active": null}));

    let trimmed = instance
        .to_value_with(SerializeOptions {
            exclude_absent: true,
        })
        .unwrap();
    assert_eq!(trimmed, json!({"name": "core", "members": [{"id": 7}]}));
}

#[test]
fn serialized_instance_revalidates_to_the_same_instance() {
    let validator = ModelValidator::new();
    let model = team();
    let first = validator
        .validate(&model, &json!({"name": "core", "members": [{"id": 1, "active": false}]}))
        .unwrap();
    let second = validator.validate(&model, &first.to_value().unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn inferred_model_validates_template_shaped_payloads() {
    let model = json_to_model(
        r#"{"first_name": "string", "meta": {"count": "integer"}}"#,
        "Sample",
    )
    .unwrap();
    let validator = ModelValidator::new();
    assert!(validator
        .validate(&model, &json!({"first_name": "Ana", "meta": {"count": 2}}))
        .is_ok());
    let err = validator
        .validate(&model, &json!({"first_name": "Ana", "meta": {}}))
        .unwrap_err();
    assert_eq!(violation_paths(&err), ["/meta/count"]);
}

// ---------------------------------------------------------------------------
// Optional fields accept omission
// ---------------------------------------------------------------------------

fn optional_fields() -> impl Strategy<Value = Vec<(String, &'static str)>> {
    prop::collection::btree_map(
        "[a-z]{1,8}",
        prop::sample::select(&["string", "integer", "boolean", "number", "array"][..]),
        0..10,
    )
    .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn optional_fields_accept_empty_payload(fields in optional_fields()) {
        let mut properties = Map::new();
        for (name, ty) in &fields {
            properties.insert(name.clone(), json!({ "type": ty }));
        }
        let model = compile(json!({"title": "Loose", "properties": properties}));
        let instance = ModelValidator::new().validate(&model, &json!({})).unwrap();
        prop_assert_eq!(instance.fields().len(), fields.len());
        prop_assert!(instance.fields().iter().all(|f| f.value.is_absent()));
    }

    #[test]
    fn required_fields_each_report_once(fields in optional_fields()) {
        let mut properties = Map::new();
        for (name, ty) in &fields {
            properties.insert(name.clone(), json!({ "type": ty }));
        }
        let required: Vec<&String> = fields.iter().map(|(name, _)| name).collect();
        let model = compile(json!({
            "title": "Strict",
            "properties": properties,
            "required": required,
        }));
        match ModelValidator::new().validate(&model, &json!({})) {
            Ok(_) => prop_assert!(fields.is_empty()),
            Err(err) => prop_assert_eq!(err.violations().unwrap().len(), fields.len()),
        }
    }
}
