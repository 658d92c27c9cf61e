//! # Infer Subcommand
//!
//! Reads a sample whose leaf values are type names and prints the inferred
//! schema, or with `--compile` the compiled model descriptor.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dyntamic_core::Schema;
use dyntamic_schema::{SchemaCompiler, SchemaInferrer};

use crate::config::CliConfig;
use crate::document::load_document;

/// Arguments for the infer subcommand.
#[derive(Args, Debug)]
pub struct InferArgs {
    /// Sample file (JSON, or YAML by extension).
    pub sample: PathBuf,

    /// Title of the root model.
    #[arg(long)]
    pub title: Option<String>,

    /// Prefix used for the emitted `$ref` pointers.
    #[arg(long)]
    pub ref_prefix: Option<String>,

    /// Compile the inferred schema and print the descriptor.
    #[arg(long)]
    pub compile: bool,
}

/// Infer a schema from the sample file.
pub fn infer_file(args: &InferArgs, config: &CliConfig) -> Result<Schema> {
    let sample = load_document(&args.sample)?;
    let title = config.title(args.title.as_deref());
    let inferrer = SchemaInferrer::with_ref_prefix(config.ref_prefix(args.ref_prefix.as_deref()));
    inferrer
        .infer(&sample, &title)
        .with_context(|| format!("cannot infer schema from: {}", args.sample.display()))
}

/// Render the infer output for `args`.
pub fn render_infer(args: &InferArgs, config: &CliConfig) -> Result<String> {
    let schema = infer_file(args, config)?;
    tracing::info!(
        title = %schema.title,
        definitions = schema.definitions.len(),
        "schema inferred"
    );

    if !args.compile {
        return Ok(serde_json::to_string_pretty(&schema)?);
    }

    let compiler = SchemaCompiler::with_options(config.compile_options(args.ref_prefix.as_deref()));
    let model = compiler
        .compile(&schema, None)
        .with_context(|| format!("inferred schema does not compile: {}", args.sample.display()))?;
    Ok(serde_json::to_string_pretty(&model)?)
}

/// Execute the infer subcommand.
pub fn run_infer(args: &InferArgs, config: &CliConfig) -> Result<u8> {
    println!("{}", render_infer(args, config)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("sample.json");
        std::fs::write(
            &path,
            r#"{"first_name": "string", "address": {"zip_code": "integer"}}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn infers_with_configured_title() {
        let dir = tempfile::tempdir().unwrap();
        let args = InferArgs {
            sample: sample(dir.path()),
            title: None,
            ref_prefix: None,
            compile: false,
        };
        let config = CliConfig {
            default_title: Some("Customer".into()),
            ..CliConfig::default()
        };
        let schema = infer_file(&args, &config).unwrap();
        assert_eq!(schema.title, "Customer");
        assert!(schema.definitions.contains_key("Address"));
        assert!(schema.is_required("first_name"));
    }

    #[test]
    fn compile_flag_prints_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let args = InferArgs {
            sample: sample(dir.path()),
            title: Some("Customer".into()),
            ref_prefix: Some("#/definitions/".into()),
            compile: true,
        };
        let out: serde_json::Value =
            serde_json::from_str(&render_infer(&args, &CliConfig::default()).unwrap()).unwrap();
        assert_eq!(out["name"], "Customer");
        assert_eq!(out["fields"][1]["name"], "address");
    }
}
