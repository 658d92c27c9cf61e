//! # Model Descriptors
//!
//! The compiled output of a schema: a named, ordered list of fields. A field
//! that points at a nested definition owns a full copy of that definition's
//! descriptor. There is no sharing and no back-reference, so a descriptor is
//! a plain tree that is `Send + Sync` and compares structurally.

use serde::{Deserialize, Serialize};

use crate::kind::PrimitiveKind;

/// What a compiled field holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// A primitive value (including the untyped `List`).
    Primitive(PrimitiveKind),
    /// A nested model, owned.
    Model(ModelDescriptor),
    /// A list whose elements are checked against the inner kind.
    List(Box<ValueKind>),
}

impl ValueKind {
    /// The nested descriptor this kind embeds, looking through lists.
    pub fn model(&self) -> Option<&ModelDescriptor> {
        match self {
            Self::Primitive(_) => None,
            Self::Model(model) => Some(model),
            Self::List(inner) => inner.model(),
        }
    }

    /// Short human-readable form, e.g. `integer`, `Address`, `list[Address]`.
    pub fn describe(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.to_string(),
            Self::Model(model) => model.name.clone(),
            Self::List(inner) => format!("list[{}]", inner.describe()),
        }
    }
}

/// One compiled field.
///
/// When `required` is false the effective type is `Optional(kind)`: a
/// payload may omit the key or set it to `null`, and the field is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledField {
    /// Property name.
    pub name: String,
    /// Key used when reading and writing payloads. Equal to `name`.
    pub alias: String,
    /// Resolved kind.
    pub kind: ValueKind,
    /// Whether the key must be present and non-null.
    pub required: bool,
    /// Title copied from the schema, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description copied from the schema, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CompiledField {
    /// True when absence is accepted.
    pub fn is_optional(&self) -> bool {
        !self.required
    }
}

/// A compiled model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name, taken from the schema title.
    pub name: String,
    /// Name of the base model whose fields this one extends, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<CompiledField>,
}

impl ModelDescriptor {
    /// An empty descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            fields: Vec::new(),
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the model has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Fields that must be present.
    pub fn required_fields(&self) -> impl Iterator<Item = &CompiledField> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Maximum nesting depth; a model with only primitive fields has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .fields
            .iter()
            .filter_map(|f| f.kind.model())
            .map(ModelDescriptor::depth)
            .max()
            .unwrap_or(0)
    }
}
