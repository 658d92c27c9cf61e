//! # Schema Data Model
//!
//! The JSON-Schema subset the compiler consumes: a titled object with
//! ordered `properties`, a `required` list, and a local definition table
//! that `$ref` pointers resolve against.
//!
//! ## Accepted Shapes
//!
//! A property is one of:
//!
//! - `{ "type": "<primitive>" }`
//! - `{ "$ref": "<prefix><DefinitionName>" }`
//! - `{ "type": "array", "items": <property> }`
//!
//! `$ref` wins when a property carries both `$ref` and `type`. The
//! definition table is read from `$defs` and from `definitions`; when both
//! are present they are merged and `$defs` wins on a name collision.
//!
//! Property declaration order is preserved; it becomes the field order of
//! the compiled descriptor.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Reference pointer prefix used when the caller does not configure one.
pub const DEFAULT_REF_PREFIX: &str = "#/$defs/";

/// The structural part of a [`FieldSpec`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    /// A named primitive type. The name is not checked until compilation.
    Primitive {
        /// Declared type name, e.g. `"string"`.
        type_name: String,
    },
    /// A pointer into the definition table.
    Reference {
        /// The pointer exactly as written, prefix included.
        pointer: String,
    },
    /// An array. `items` is `None` when absent, not an object, or an object
    /// with neither `$ref` nor `type`.
    Array {
        /// Element spec, if one could be read.
        items: Option<Box<FieldSpec>>,
    },
}

/// One property declaration, immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// What the property holds.
    pub shape: FieldShape,
    /// Optional human-readable title.
    pub title: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

impl FieldSpec {
    /// A primitive-typed property.
    pub fn primitive(type_name: impl Into<String>) -> Self {
        Self::from_shape(FieldShape::Primitive {
            type_name: type_name.into(),
        })
    }

    /// A `$ref` property.
    pub fn reference(pointer: impl Into<String>) -> Self {
        Self::from_shape(FieldShape::Reference {
            pointer: pointer.into(),
        })
    }

    /// An array property with an optional element spec.
    pub fn array(items: Option<FieldSpec>) -> Self {
        Self::from_shape(FieldShape::Array {
            items: items.map(Box::new),
        })
    }

    /// Attach a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn from_shape(shape: FieldShape) -> Self {
        Self {
            shape,
            title: None,
            description: None,
        }
    }

    /// Read a property declaration.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MalformedSchema` if the value is not an object,
    /// has neither `$ref` nor `type`, or carries a non-string `type`/`$ref`.
    pub fn from_value(field: &str, value: &Value) -> Result<Self, SchemaError> {
        let obj = value.as_object().ok_or_else(|| {
            SchemaError::malformed(format!("property '{field}' must be an object"))
        })?;

        let shape = if let Some(pointer) = obj.get("$ref") {
            let pointer = pointer.as_str().ok_or_else(|| {
                SchemaError::malformed(format!("property '{field}' has a non-string $ref"))
            })?;
            FieldShape::Reference {
                pointer: pointer.to_string(),
            }
        } else {
            let type_name = match obj.get("type") {
                Some(Value::String(s)) => s.as_str(),
                Some(_) => {
                    return Err(SchemaError::malformed(format!(
                        "property '{field}' has a non-string type"
                    )))
                }
                None => {
                    return Err(SchemaError::malformed(format!(
                        "property '{field}' declares neither type nor $ref"
                    )))
                }
            };
            if type_name == "array" {
                let items = match obj.get("items") {
                    Some(items) => Self::items_from_value(field, items)?,
                    None => None,
                };
                FieldShape::Array {
                    items: items.map(Box::new),
                }
            } else {
                FieldShape::Primitive {
                    type_name: type_name.to_string(),
                }
            }
        };

        Ok(Self {
            shape,
            title: string_member(obj, "title"),
            description: string_member(obj, "description"),
        })
    }

    // An unrecognised items shape is dropped; a recognised one must parse.
    fn items_from_value(field: &str, items: &Value) -> Result<Option<FieldSpec>, SchemaError> {
        match items.as_object() {
            Some(obj) if obj.contains_key("$ref") || obj.contains_key("type") => {
                Self::from_value(field, items).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Render back to the schema subset.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        match &self.shape {
            FieldShape::Primitive { type_name } => {
                obj.insert("type".into(), Value::String(type_name.clone()));
            }
            FieldShape::Reference { pointer } => {
                obj.insert("$ref".into(), Value::String(pointer.clone()));
            }
            FieldShape::Array { items } => {
                obj.insert("type".into(), Value::String("array".into()));
                if let Some(items) = items {
                    obj.insert("items".into(), items.to_value());
                }
            }
        }
        if let Some(title) = &self.title {
            obj.insert("title".into(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            obj.insert("description".into(), Value::String(description.clone()));
        }
        Value::Object(obj)
    }
}

impl Serialize for FieldSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// A named property in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name as it appears in payloads.
    pub name: String,
    /// Its declaration.
    pub spec: FieldSpec,
}

/// A titled object schema with its local definition table.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Model name.
    pub title: String,
    /// Declared schema type; `"object"` when omitted.
    pub schema_type: String,
    /// Properties in declaration order.
    pub properties: Vec<Property>,
    /// Names of required properties, without duplicates.
    pub required: Vec<String>,
    /// Named nested schemas targeted by `$ref`.
    pub definitions: BTreeMap<String, Schema>,
}

impl Schema {
    /// An empty object schema.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            schema_type: "object".to_string(),
            properties: Vec::new(),
            required: Vec::new(),
            definitions: BTreeMap::new(),
        }
    }

    /// Append a property, optionally marking it required.
    pub fn with_property(mut self, name: impl Into<String>, spec: FieldSpec, required: bool) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.push(Property { name, spec });
        self
    }

    /// Add or replace a definition-table entry.
    pub fn with_definition(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.definitions.insert(name.into(), schema);
        self
    }

    /// Parse a top-level schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MalformedSchema` when the value is not an
    /// object, lacks `title` or `properties`, or any nested part is ill-typed.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        Self::parse(value, None)
    }

    /// Parse a schema from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SchemaError::malformed(format!("invalid JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Parse a definition-table entry. A missing `title` defaults to `name`.
    pub fn from_definition(name: &str, value: &Value) -> Result<Self, SchemaError> {
        Self::parse(value, Some(name))
    }

    fn parse(value: &Value, default_title: Option<&str>) -> Result<Self, SchemaError> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed("schema must be a JSON object"))?;

        let title = match (obj.get("title"), default_title) {
            (Some(Value::String(t)), _) => t.clone(),
            (Some(_), _) => return Err(SchemaError::malformed("schema title must be a string")),
            (None, Some(name)) => name.to_string(),
            (None, None) => return Err(SchemaError::malformed("schema is missing 'title'")),
        };

        let schema_type = match obj.get("type") {
            None => "object".to_string(),
            Some(Value::String(t)) => t.clone(),
            Some(_) => {
                return Err(SchemaError::malformed(format!(
                    "schema '{title}' has a non-string type"
                )))
            }
        };

        let raw_properties = obj
            .get("properties")
            .ok_or_else(|| SchemaError::malformed(format!("schema '{title}' is missing 'properties'")))?
            .as_object()
            .ok_or_else(|| {
                SchemaError::malformed(format!("schema '{title}' properties must be an object"))
            })?;

        let properties = raw_properties
            .iter()
            .map(|(name, spec)| {
                Ok(Property {
                    name: name.clone(),
                    spec: FieldSpec::from_value(name, spec)?,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        let mut required: Vec<String> = Vec::new();
        if let Some(raw_required) = obj.get("required") {
            let list = raw_required.as_array().ok_or_else(|| {
                SchemaError::malformed(format!("schema '{title}' required must be an array"))
            })?;
            for entry in list {
                let name = entry.as_str().ok_or_else(|| {
                    SchemaError::malformed(format!(
                        "schema '{title}' required entries must be strings"
                    ))
                })?;
                if !required.iter().any(|r| r == name) {
                    required.push(name.to_string());
                }
            }
        }

        let mut definitions = BTreeMap::new();
        // `definitions` first so that `$defs` overrides it.
        for key in ["definitions", "$defs"] {
            let Some(table) = obj.get(key) else { continue };
            let table = table.as_object().ok_or_else(|| {
                SchemaError::malformed(format!("schema '{title}' {key} must be an object"))
            })?;
            for (name, def) in table {
                definitions.insert(name.clone(), Schema::from_definition(name, def)?);
            }
        }

        Ok(Self {
            title,
            schema_type,
            properties,
            required,
            definitions,
        })
    }

    /// Whether `name` is listed in `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&FieldSpec> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.spec)
    }

    /// Render back to the schema subset, definitions under `$defs`.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("title".into(), Value::String(self.title.clone()));
        obj.insert("type".into(), Value::String(self.schema_type.clone()));

        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.spec.to_value()))
            .collect();
        obj.insert("properties".into(), Value::Object(properties));

        obj.insert(
            "required".into(),
            Value::Array(self.required.iter().cloned().map(Value::String).collect()),
        );

        if !self.definitions.is_empty() {
            let defs: Map<String, Value> = self
                .definitions
                .iter()
                .map(|(name, def)| (name.clone(), def.to_value()))
                .collect();
            obj.insert("$defs".into(), Value::Object(defs));
        }
        Value::Object(obj)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn string_member(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}
