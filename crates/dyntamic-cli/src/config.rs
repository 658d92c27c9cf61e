//! # CLI Configuration
//!
//! Optional settings file passed with `--config`. Command-line flags take
//! precedence over the file, and the file over built-in defaults.
//!
//! ```yaml
//! ref_prefix: "#/definitions/"
//! exclude_absent: true
//! default_title: AnswerFormat
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use dyntamic_core::DEFAULT_REF_PREFIX;
use dyntamic_schema::{CompileOptions, DEFAULT_TITLE};
use serde::Deserialize;

use crate::document::load_document;

/// Settings read from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// `$ref` prefix for compilation and inference.
    pub ref_prefix: Option<String>,
    /// Drop absent fields from serialized instances.
    pub exclude_absent: Option<bool>,
    /// Title for inferred schemas.
    pub default_title: Option<String>,
}

impl CliConfig {
    /// Read a config file (JSON or YAML). An empty YAML file yields the
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let value = load_document(path)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    /// Read the config file if one was given, defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Effective `$ref` prefix.
    pub fn ref_prefix(&self, flag: Option<&str>) -> String {
        flag.or(self.ref_prefix.as_deref())
            .unwrap_or(DEFAULT_REF_PREFIX)
            .to_string()
    }

    /// Effective compile options.
    pub fn compile_options(&self, flag: Option<&str>) -> CompileOptions {
        CompileOptions {
            ref_prefix: self.ref_prefix(flag),
        }
    }

    /// Effective `exclude_absent`: the flag can only switch it on.
    pub fn exclude_absent(&self, flag: bool) -> bool {
        flag || self.exclude_absent.unwrap_or(false)
    }

    /// Effective inference title.
    pub fn title(&self, flag: Option<&str>) -> String {
        flag.or(self.default_title.as_deref())
            .unwrap_or(DEFAULT_TITLE)
            .to_string()
    }
}
