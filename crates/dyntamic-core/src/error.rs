//! # Error Types: Compilation Error Taxonomy
//!
//! Every failure the compiler can report. All variants are fatal to the
//! compile call that produced them: no partially compiled descriptor is ever
//! returned alongside an error.

use thiserror::Error;

/// Error raised while parsing, resolving, or compiling a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A `$ref` pointer names a definition that is not in scope.
    #[error("unresolved reference '{pointer}'")]
    UnresolvedReference {
        /// The pointer exactly as written in the schema.
        pointer: String,
    },

    /// A field declares a type name the type map does not know.
    #[error("unknown primitive type '{type_name}' for field '{field}'")]
    UnknownPrimitiveType {
        /// Name of the offending property.
        field: String,
        /// The unrecognised type name.
        type_name: String,
    },

    /// The schema does not have the shape the compiler requires.
    #[error("malformed schema: {reason}")]
    MalformedSchema {
        /// What is missing or ill-typed.
        reason: String,
    },

    /// A definition transitively references itself.
    #[error("cyclic schema definition: {}", path.join(" -> "))]
    CyclicSchema {
        /// Definition names on the resolution path, ending with the repeat.
        path: Vec<String>,
    },
}

impl SchemaError {
    /// Shorthand for [`SchemaError::MalformedSchema`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSchema {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_display_joins_path() {
        let err = SchemaError::CyclicSchema {
            path: vec!["Node".into(), "Edge".into(), "Node".into()],
        };
        assert_eq!(err.to_string(), "cyclic schema definition: Node -> Edge -> Node");
    }

    #[test]
    fn unknown_type_display_names_field() {
        let err = SchemaError::UnknownPrimitiveType {
            field: "age".into(),
            type_name: "int32".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'int32'"));
        assert!(msg.contains("'age'"));
    }
}
