//! # Type Map
//!
//! Static mapping from schema primitive type names to runtime value kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime kind of a primitive schema value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// UTF-8 string.
    Text,
    /// Untyped JSON array; elements are not checked.
    List,
    /// `true` / `false`.
    Boolean,
    /// JSON integer.
    Integer,
    /// Any JSON number.
    Float,
}

impl PrimitiveKind {
    /// Canonical schema type name for this kind.
    ///
    /// `Float` maps back to `"number"`, the name JSON Schema dumps use.
    pub fn schema_name(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::List => "array",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "number",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

/// A type name outside the primitive map, parsed without a field context.
///
/// Inside a schema the compiler reports
/// [`SchemaError::UnknownPrimitiveType`](crate::SchemaError::UnknownPrimitiveType)
/// instead, naming the property.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown primitive type '{0}'")]
pub struct UnknownTypeName(pub String);

impl FromStr for PrimitiveKind {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        primitive_kind(s).ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

/// Look up the runtime kind for a schema type name.
///
/// Returns `None` for any name outside the map; callers must turn that
/// into [`SchemaError::UnknownPrimitiveType`].
pub fn primitive_kind(type_name: &str) -> Option<PrimitiveKind> {
    match type_name {
        "string" => Some(PrimitiveKind::Text),
        "array" => Some(PrimitiveKind::List),
        "boolean" => Some(PrimitiveKind::Boolean),
        "integer" => Some(PrimitiveKind::Integer),
        "float" | "number" => Some(PrimitiveKind::Float),
        _ => None,
    }
}
