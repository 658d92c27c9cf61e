//! # Schema Compiler
//!
//! The recursive driver. Walks a schema's properties in declaration order
//! and produces one [`CompiledField`] per property:
//!
//! - `$ref` → resolve, compile the definition, embed it as a nested model;
//! - `array` of `$ref` → the same, wrapped in a list;
//! - `array` of anything else → an untyped list;
//! - anything else → the type map.
//!
//! ## Definition Scope
//!
//! A nested definition is compiled against the table of its enclosing
//! schema, overlaid with its own `$defs` if it has any, so that
//! nested-of-nested references keep resolving. A local entry shadows an
//! outer entry with the same name.
//!
//! ## Cycles
//!
//! Every visible definition carries its location in the document (the
//! chain of definition keys leading to it). The locations of the
//! definitions currently being compiled are threaded through the
//! recursion; reaching one already on that path fails with
//! [`SchemaError::CyclicSchema`] instead of recursing without bound. A
//! shadowing definition has its own location, so reaching it is not a cycle.
//!
//! ## Arrays
//!
//! Only an array whose `items` is itself a `$ref` becomes a typed list.
//! Any other `items` clause is still checked: references inside it must
//! resolve and type names must be known, even though the compiled field is
//! an untyped list.
//!
//! ## Purity
//!
//! No global registry and no caching: every call compiles every occurrence
//! of a definition afresh and returns an independent owned tree.

use std::borrow::Cow;
use std::collections::BTreeMap;

use dyntamic_core::{
    primitive_kind, CompiledField, FieldShape, FieldSpec, ModelDescriptor, PrimitiveKind, Property,
    Schema, SchemaError, ValueKind, DEFAULT_REF_PREFIX,
};
use serde_json::Value;

use crate::field::{compile_field, with_metadata};
use crate::resolve::ReferenceResolver;

/// A definition visible from the current position.
#[derive(Debug, Clone)]
struct Visible<'s> {
    /// Chain of definition keys from the root, `/`-separated.
    location: String,
    schema: &'s Schema,
}

type Scope<'s> = BTreeMap<&'s str, Visible<'s>>;

/// One definition on the resolution path.
#[derive(Debug)]
struct Frame {
    location: String,
    name: String,
}

/// Per-compiler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Prefix every `$ref` pointer carries before the definition name.
    pub ref_prefix: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
        }
    }
}

/// Compiles schemas into [`ModelDescriptor`]s.
///
/// Holds only configuration, so one compiler can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaCompiler {
    options: CompileOptions,
}

impl SchemaCompiler {
    /// A compiler with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// A compiler with explicit options.
    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// A compiler for pointers with a non-default prefix.
    pub fn with_ref_prefix(prefix: impl Into<String>) -> Self {
        Self::with_options(CompileOptions {
            ref_prefix: prefix.into(),
        })
    }

    /// The active options.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `schema` into a descriptor named after its title.
    ///
    /// When `base` is given, its fields come first; a declared property with
    /// the same name as a base field replaces that field in place.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`]. No partial descriptor is returned.
    pub fn compile(
        &self,
        schema: &Schema,
        base: Option<&ModelDescriptor>,
    ) -> Result<ModelDescriptor, SchemaError> {
        let scope = local_definitions(Scope::new(), "", schema);
        let mut path = Vec::new();
        let mut model = self.compile_model(schema, &scope, &mut path)?;

        if let Some(base) = base {
            let mut fields = base.fields.clone();
            for field in model.fields {
                match fields.iter_mut().find(|f| f.name == field.name) {
                    Some(slot) => *slot = field,
                    None => fields.push(field),
                }
            }
            model.fields = fields;
            model.base = Some(base.name.clone());
        }

        tracing::debug!(
            model = %model.name,
            fields = model.len(),
            depth = model.depth(),
            "compiled model"
        );
        Ok(model)
    }

    /// Parse and compile a schema value in one step.
    pub fn compile_value(
        &self,
        value: &Value,
        base: Option<&ModelDescriptor>,
    ) -> Result<ModelDescriptor, SchemaError> {
        self.compile(&Schema::from_value(value)?, base)
    }

    fn resolver(&self) -> ReferenceResolver<'_> {
        ReferenceResolver::new(&self.options.ref_prefix)
    }

    fn compile_model<'s>(
        &self,
        schema: &'s Schema,
        scope: &Scope<'s>,
        path: &mut Vec<Frame>,
    ) -> Result<ModelDescriptor, SchemaError> {
        tracing::trace!(model = %schema.title, properties = schema.properties.len(), "compiling model");
        let fields = schema
            .properties
            .iter()
            .map(|property| self.compile_property(property, schema, scope, path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ModelDescriptor {
            name: schema.title.clone(),
            base: None,
            fields,
        })
    }

    fn compile_property<'s>(
        &self,
        property: &Property,
        schema: &Schema,
        scope: &Scope<'s>,
        path: &mut Vec<Frame>,
    ) -> Result<CompiledField, SchemaError> {
        let kind = match &property.spec.shape {
            FieldShape::Reference { pointer } => {
                ValueKind::Model(self.compile_reference(pointer, scope, path)?)
            }
            FieldShape::Array { items } => {
                if let Some(FieldShape::Reference { pointer }) = items.as_deref().map(|spec| &spec.shape) {
                    ValueKind::List(Box::new(ValueKind::Model(
                        self.compile_reference(pointer, scope, path)?,
                    )))
                } else {
                    if let Some(spec) = items.as_deref() {
                        self.check_elements(&property.name, spec, scope, path)?;
                    }
                    tracing::debug!(
                        model = %schema.title,
                        field = %property.name,
                        "array items are not a reference; element types are not enforced"
                    );
                    ValueKind::Primitive(PrimitiveKind::List)
                }
            }
            FieldShape::Primitive { type_name } => {
                ValueKind::Primitive(known_primitive(&property.name, type_name)?)
            }
        };

        let field = compile_field(&property.name, kind, &schema.required);
        tracing::trace!(
            model = %schema.title,
            field = %field.name,
            kind = %field.kind.describe(),
            required = field.required,
            "compiled field"
        );
        Ok(with_metadata(field, &property.spec))
    }

    /// Check an `items` clause that does not become a typed list.
    fn check_elements<'s>(
        &self,
        field: &str,
        spec: &FieldSpec,
        scope: &Scope<'s>,
        path: &mut Vec<Frame>,
    ) -> Result<(), SchemaError> {
        match &spec.shape {
            FieldShape::Reference { pointer } => {
                self.compile_reference(pointer, scope, path)?;
                Ok(())
            }
            FieldShape::Primitive { type_name } => {
                known_primitive(field, type_name)?;
                Ok(())
            }
            FieldShape::Array { items: Some(items) } => {
                self.check_elements(field, items, scope, path)
            }
            FieldShape::Array { items: None } => Ok(()),
        }
    }

    fn compile_reference<'s>(
        &self,
        pointer: &str,
        scope: &Scope<'s>,
        path: &mut Vec<Frame>,
    ) -> Result<ModelDescriptor, SchemaError> {
        let (name, target) = self.resolver().resolve(pointer, scope)?;
        tracing::debug!(pointer, definition = name, location = %target.location, "resolved reference");

        if path.iter().any(|frame| frame.location == target.location) {
            let mut cycle: Vec<String> = path.iter().map(|frame| frame.name.clone()).collect();
            cycle.push(name.to_string());
            return Err(SchemaError::CyclicSchema { path: cycle });
        }

        let nested_scope = if target.schema.definitions.is_empty() {
            Cow::Borrowed(scope)
        } else {
            Cow::Owned(local_definitions(scope.clone(), &target.location, target.schema))
        };

        path.push(Frame {
            location: target.location.clone(),
            name: name.to_string(),
        });
        let result = self.compile_model(target.schema, &nested_scope, path);
        path.pop();
        result
    }
}

/// `scope` with the definitions of `owner` (found at `location`) layered on top.
fn local_definitions<'s>(mut scope: Scope<'s>, location: &str, owner: &'s Schema) -> Scope<'s> {
    for (name, schema) in &owner.definitions {
        let escaped = name.replace('~', "~0").replace('/', "~1");
        scope.insert(
            name.as_str(),
            Visible {
                location: format!("{location}/{escaped}"),
                schema,
            },
        );
    }
    scope
}

fn known_primitive(field: &str, type_name: &str) -> Result<PrimitiveKind, SchemaError> {
    primitive_kind(type_name).ok_or_else(|| SchemaError::UnknownPrimitiveType {
        field: field.to_string(),
        type_name: type_name.to_string(),
    })
}
