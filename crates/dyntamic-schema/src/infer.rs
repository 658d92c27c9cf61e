//! # Schema Inference from Type-Name Templates
//!
//! Builds a [`Schema`] from a JSON *template* whose leaf values are type
//! names, not instances:
//!
//! ```json
//! { "first_name": "string", "meta": { "count": "integer" } }
//! ```
//!
//! The inferrer never inspects runtime value types. `"age": 30` does not
//! become an integer field; its type name is the text `30`, which the
//! compiler later rejects as an unknown primitive type.
//!
//! Nested objects become definitions named after their key (first letter
//! upper-cased, the rest lower-cased: `year_of_birth` → `Year_of_birth`) and
//! are referenced with `$ref`. Definitions found at every depth are flattened
//! into the root table. Two nested objects that derive the same name
//! overwrite each other; the one discovered last wins.
//!
//! Every key is required.

use std::collections::BTreeMap;

use dyntamic_core::{FieldSpec, ModelDescriptor, Schema, SchemaError, DEFAULT_REF_PREFIX};
use serde_json::{Map, Value};

use crate::compiler::SchemaCompiler;
use crate::resolve::ReferenceResolver;

/// Title given to inferred schemas when the caller has none.
pub const DEFAULT_TITLE: &str = "DynamicModel";

/// Infers schemas from type-name templates.
#[derive(Debug, Clone)]
pub struct SchemaInferrer {
    ref_prefix: String,
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self {
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
        }
    }
}

impl SchemaInferrer {
    /// An inferrer that emits `#/$defs/` pointers.
    pub fn new() -> Self {
        Self::default()
    }

    /// An inferrer that emits pointers with `prefix`.
    pub fn with_ref_prefix(prefix: impl Into<String>) -> Self {
        Self {
            ref_prefix: prefix.into(),
        }
    }

    /// Infer a schema titled `title` from `sample`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MalformedSchema` if `sample` is not an object.
    pub fn infer(&self, sample: &Value, title: &str) -> Result<Schema, SchemaError> {
        let obj = sample
            .as_object()
            .ok_or_else(|| SchemaError::malformed("inference sample must be a JSON object"))?;

        let mut definitions = BTreeMap::new();
        let mut schema = self.infer_object(obj, title, &mut definitions);
        schema.definitions = definitions;

        tracing::debug!(
            title,
            properties = schema.properties.len(),
            definitions = schema.definitions.len(),
            "inferred schema"
        );
        Ok(schema)
    }

    /// Parse `raw` as JSON, then [`infer`](Self::infer).
    pub fn infer_str(&self, raw: &str, title: &str) -> Result<Schema, SchemaError> {
        let sample: Value = serde_json::from_str(raw)
            .map_err(|e| SchemaError::malformed(format!("invalid JSON sample: {e}")))?;
        self.infer(&sample, title)
    }

    fn infer_object(
        &self,
        obj: &Map<String, Value>,
        title: &str,
        definitions: &mut BTreeMap<String, Schema>,
    ) -> Schema {
        let resolver = ReferenceResolver::new(&self.ref_prefix);
        let mut schema = Schema::new(title);

        for (key, value) in obj {
            let spec = match value {
                Value::Object(nested) => {
                    let name = definition_name(key);
                    let mut nested_definitions = BTreeMap::new();
                    let nested_schema = self.infer_object(nested, &name, &mut nested_definitions);
                    definitions.insert(name.clone(), nested_schema);
                    definitions.extend(nested_definitions);
                    FieldSpec::reference(resolver.pointer_for(&name))
                }
                Value::String(type_name) => {
                    FieldSpec::primitive(type_name.clone()).with_title(field_title(key))
                }
                other => FieldSpec::primitive(other.to_string()).with_title(field_title(key)),
            };
            schema = schema.with_property(key.clone(), spec, true);
        }
        schema
    }
}

/// Infer a schema from JSON text and compile it.
///
/// # Errors
///
/// Any [`SchemaError`] from inference or compilation.
pub fn json_to_model(raw: &str, title: &str) -> Result<ModelDescriptor, SchemaError> {
    let schema = SchemaInferrer::new().infer_str(raw, title)?;
    SchemaCompiler::new().compile(&schema, None)
}

/// Definition name for a nested object under `key`.
pub fn definition_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Display title for a primitive property: `first_name` → `First Name`.
pub fn field_title(key: &str) -> String {
    let mut title = String::with_capacity(key.len());
    let mut word_start = true;
    for c in key.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if word_start {
                title.extend(c.to_uppercase());
            } else {
                title.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            title.push(c);
            word_start = true;
        }
    }
    title
}
