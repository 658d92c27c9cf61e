//! # Compile Subcommand
//!
//! Compiles a schema file into a model descriptor and prints it as JSON.
//! With `--base`, a second schema is compiled first and its fields are
//! inherited. With `--export`, the compiled model is dumped back to the
//! schema subset instead.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use dyntamic_core::ModelDescriptor;
use dyntamic_schema::{to_json_schema, SchemaCompiler};

use crate::config::CliConfig;
use crate::document::load_document;

/// Arguments for the compile subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Schema file (JSON, or YAML by extension).
    pub schema: PathBuf,

    /// Prefix of `$ref` pointers, e.g. `#/definitions/`.
    #[arg(long)]
    pub ref_prefix: Option<String>,

    /// Schema whose compiled fields are inherited.
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// Print the compiled model as a schema instead of a descriptor.
    #[arg(long)]
    pub export: bool,
}

/// Compile a schema file, with an optional base schema file.
pub fn compile_file(
    schema: &Path,
    base: Option<&Path>,
    compiler: &SchemaCompiler,
) -> Result<ModelDescriptor> {
    let base = match base {
        Some(path) => Some(compile_file(path, None, compiler)?),
        None => None,
    };

    let value = load_document(schema)?;
    compiler
        .compile_value(&value, base.as_ref())
        .with_context(|| format!("cannot compile schema: {}", schema.display()))
}

/// Render the compile output for `args`.
pub fn render_compile(args: &CompileArgs, config: &CliConfig) -> Result<String> {
    let options = config.compile_options(args.ref_prefix.as_deref());
    let compiler = SchemaCompiler::with_options(options);
    let model = compile_file(&args.schema, args.base.as_deref(), &compiler)?;

    tracing::info!(
        model = %model.name,
        fields = model.len(),
        schema = %args.schema.display(),
        "schema compiled"
    );

    let text = if args.export {
        serde_json::to_string_pretty(&to_json_schema(&model, &compiler.options().ref_prefix))?
    } else {
        serde_json::to_string_pretty(&model)?
    };
    Ok(text)
}

/// Execute the compile subcommand.
pub fn run_compile(args: &CompileArgs, config: &CliConfig) -> Result<u8> {
    println!("{}", render_compile(args, config)?);
    Ok(0)
}
