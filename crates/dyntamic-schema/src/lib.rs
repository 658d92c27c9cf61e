//! # dyntamic-schema: Schema Compilation
//!
//! Compiles JSON-Schema-subset documents into owned [`ModelDescriptor`]s.
//!
//! ## Compilation (`compiler`)
//!
//! [`SchemaCompiler::compile`] walks a schema's properties in declaration
//! order. `$ref` properties (and arrays of them) are resolved through
//! [`ReferenceResolver`] against the schema's definition table and compiled
//! recursively; everything else goes through the primitive type map and
//! [`compile_field`]. Each call is pure: no registry, no cache, no mutation
//! of the input.
//!
//! ## Inference (`infer`)
//!
//! [`SchemaInferrer`] produces a schema from a template whose leaf values
//! are type names, and [`json_to_model`] chains inference and compilation.
//!
//! ## Export (`export`)
//!
//! [`to_json_schema`] dumps a descriptor back to the schema subset.
//!
//! ```
//! use dyntamic_schema::SchemaCompiler;
//! use serde_json::json;
//!
//! let model = SchemaCompiler::new()
//!     .compile_value(
//!         &json!({
//!             "title": "Person",
//!             "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
//!             "required": ["name"]
//!         }),
//!         None,
//!     )
//!     .unwrap();
//! assert_eq!(model.field_names(), ["name", "age"]);
//! ```
//!
//! [`ModelDescriptor`]: dyntamic_core::ModelDescriptor

pub mod compiler;
pub mod export;
pub mod field;
pub mod infer;
pub mod resolve;

pub use compiler::{CompileOptions, SchemaCompiler};
pub use export::{to_json_schema, to_schema};
pub use field::compile_field;
pub use infer::{json_to_model, SchemaInferrer, DEFAULT_TITLE};
pub use resolve::ReferenceResolver;
