//! # Reference Resolution
//!
//! Turns a `$ref` pointer of the form `<prefix><DefinitionName>` into the
//! definition it names. The prefix is stripped exactly; a pointer that does
//! not start with the configured prefix cannot resolve. Nothing is cached:
//! the caller decides whether to compile what comes back.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use dyntamic_core::SchemaError;

/// Resolves pointers against a definition table.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'p> {
    prefix: &'p str,
}

impl<'p> ReferenceResolver<'p> {
    /// A resolver for pointers that start with `prefix`.
    pub fn new(prefix: &'p str) -> Self {
        Self { prefix }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        self.prefix
    }

    /// Build the pointer that names `definition`.
    pub fn pointer_for(&self, definition: &str) -> String {
        format!("{}{definition}", self.prefix)
    }

    /// Strip the prefix from `pointer`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedReference` if the pointer does not
    /// carry the prefix or names nothing after it.
    pub fn definition_name<'a>(&self, pointer: &'a str) -> Result<&'a str, SchemaError> {
        match pointer.strip_prefix(self.prefix) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(SchemaError::UnresolvedReference {
                pointer: pointer.to_string(),
            }),
        }
    }

    /// Look up the definition `pointer` names.
    ///
    /// Returns the definition's table key together with its entry. Any
    /// table keyed by name works, whether it owns its schemas or borrows
    /// them.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedReference` if the name is not a key
    /// of `definitions`.
    pub fn resolve<'d, K, V>(
        &self,
        pointer: &str,
        definitions: &'d BTreeMap<K, V>,
    ) -> Result<(&'d str, &'d V), SchemaError>
    where
        K: Borrow<str> + Ord,
    {
        let name = self.definition_name(pointer)?;
        definitions
            .get_key_value(name)
            .map(|(key, entry)| (<K as Borrow<str>>::borrow(key), entry))
            .ok_or_else(|| SchemaError::UnresolvedReference {
                pointer: pointer.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyntamic_core::{Schema, DEFAULT_REF_PREFIX};

    fn table() -> BTreeMap<String, Schema> {
        let mut defs = BTreeMap::new();
        defs.insert("Address".to_string(), Schema::new("Address"));
        defs
    }

    #[test]
    fn resolves_known_definition() {
        let defs = table();
        let resolver = ReferenceResolver::new(DEFAULT_REF_PREFIX);
        let (name, schema) = resolver.resolve("#/$defs/Address", &defs).unwrap();
        assert_eq!(name, "Address");
        assert_eq!(schema.title, "Address");
    }

    #[test]
    fn missing_definition_is_unresolved() {
        let defs = table();
        let resolver = ReferenceResolver::new(DEFAULT_REF_PREFIX);
        let err = resolver.resolve("#/$defs/Phone", &defs).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnresolvedReference {
                pointer: "#/$defs/Phone".into()
            }
        );
    }

    #[test]
    fn wrong_prefix_is_unresolved() {
        let defs = table();
        let resolver = ReferenceResolver::new(DEFAULT_REF_PREFIX);
        assert!(resolver.resolve("#/definitions/Address", &defs).is_err());
        assert!(resolver.resolve("Address", &defs).is_err());
    }

    #[test]
    fn bare_prefix_is_unresolved() {
        let resolver = ReferenceResolver::new(DEFAULT_REF_PREFIX);
        assert!(resolver.definition_name("#/$defs/").is_err());
    }

    #[test]
    fn prefix_is_stripped_exactly() {
        // A character-set strip would eat the leading 's' of "sets".
        let resolver = ReferenceResolver::new(DEFAULT_REF_PREFIX);
        assert_eq!(resolver.definition_name("#/$defs/sets").unwrap(), "sets");
    }

    #[test]
    fn custom_prefix() {
        let defs = table();
        let resolver = ReferenceResolver::new("#/definitions/");
        assert_eq!(resolver.pointer_for("Address"), "#/definitions/Address");
        assert!(resolver.resolve("#/definitions/Address", &defs).is_ok());
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let defs = table();
        let resolver = ReferenceResolver::new("");
        assert!(resolver.resolve("Address", &defs).is_ok());
    }
}
