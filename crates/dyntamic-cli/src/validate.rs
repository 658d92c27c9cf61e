//! # Validate Subcommand
//!
//! Compiles a schema, validates a payload against it, and prints the
//! canonical serialization. Violations go to stdout one per line and the
//! command exits with status 1.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dyntamic_model::{Instance, ModelValidator, SerializeOptions, ValidationError};
use dyntamic_schema::SchemaCompiler;

use crate::compile::compile_file;
use crate::config::CliConfig;
use crate::document::load_document;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON, or YAML by extension).
    pub schema: PathBuf,

    /// Payload file to validate.
    pub payload: PathBuf,

    /// Prefix of `$ref` pointers, e.g. `#/definitions/`.
    #[arg(long)]
    pub ref_prefix: Option<String>,

    /// Leave absent optional fields out of the output.
    #[arg(long)]
    pub exclude_absent: bool,
}

/// Validate the payload file against the schema file.
///
/// The outer `Result` carries I/O and schema errors; the inner one is the
/// validation verdict.
pub fn validate_file(
    args: &ValidateArgs,
    config: &CliConfig,
) -> Result<Result<Instance, ValidationError>> {
    let compiler = SchemaCompiler::with_options(config.compile_options(args.ref_prefix.as_deref()));
    let model = compile_file(&args.schema, None, &compiler)?;
    let payload = load_document(&args.payload)
        .with_context(|| format!("cannot load payload: {}", args.payload.display()))?;
    Ok(ModelValidator::new().validate(&model, &payload))
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    match validate_file(args, config)? {
        Ok(instance) => {
            let options = SerializeOptions {
                exclude_absent: config.exclude_absent(args.exclude_absent),
            };
            println!("{}", instance.to_json_string(options)?);
            tracing::info!(model = instance.model(), "payload valid");
            Ok(0)
        }
        Err(ValidationError::ValidationFailed { model, violations }) => {
            tracing::warn!(model = %model, count = violations.len(), "payload invalid");
            println!("FAIL: {} against {model}", args.payload.display());
            println!("{violations}");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn setup(dir: &Path, payload: &str) -> ValidateArgs {
        let schema = dir.join("schema.yaml");
        std::fs::write(
            &schema,
            "title: Person\nproperties:\n  name: {type: string}\n  age: {type: integer}\nrequired: [name]\n",
        )
        .unwrap();
        let payload_path = dir.join("payload.json");
        std::fs::write(&payload_path, payload).unwrap();
        ValidateArgs {
            schema,
            payload: payload_path,
            ref_prefix: None,
            exclude_absent: false,
        }
    }

    #[test]
    fn valid_payload_yields_instance() {
        let dir = tempfile::tempdir().unwrap();
        let args = setup(dir.path(), r#"{"name": "Ana"}"#);
        let instance = validate_file(&args, &CliConfig::default()).unwrap().unwrap();
        assert_eq!(instance.model(), "Person");
        assert!(instance.get("age").unwrap().is_absent());
        assert_eq!(run_validate(&args, &CliConfig::default()).unwrap(), 0);
    }

    #[test]
    fn invalid_payload_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let args = setup(dir.path(), r#"{"age": "old"}"#);
        let err = validate_file(&args, &CliConfig::default()).unwrap().unwrap_err();
        assert_eq!(err.violations().unwrap().len(), 2);
        assert_eq!(run_validate(&args, &CliConfig::default()).unwrap(), 1);
    }

    #[test]
    fn unreadable_payload_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = setup(dir.path(), "{}");
        args.payload = dir.path().join("missing.json");
        assert!(run_validate(&args, &CliConfig::default()).is_err());
    }
}
