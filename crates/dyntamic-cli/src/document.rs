//! # Document Loading
//!
//! Reads schema, payload, sample, and config files. The format follows the
//! extension: `.yaml`/`.yml` is YAML, anything else is JSON. YAML is
//! converted to the equivalent `serde_json::Value` tree, keeping mapping
//! order.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Load a JSON or YAML document as a JSON value.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    tracing::debug!(path = %path.display(), format = ext, "loading document");

    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML: {}", path.display()))?;
            yaml_to_json_value(yaml)
                .map_err(|e| anyhow::anyhow!("YAML-to-JSON conversion failed for {}: {e}", path.display()))
        }
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON: {}", path.display())),
    }
}

/// Convert a YAML tree to the equivalent JSON tree.
///
/// Tags are stripped. Scalar mapping keys are stringified; sequence or
/// mapping keys are rejected.
fn yaml_to_json_value(yaml: serde_yaml::Value) -> Result<Value, String> {
    let value = match yaml {
        serde_yaml::Value::Tagged(tagged) => return yaml_to_json_value(tagged.value),
        serde_yaml::Value::Mapping(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| -> Result<(String, Value), String> {
                    Ok((mapping_key(k)?, yaml_to_json_value(v)?))
                })
                .collect::<Result<_, String>>()?,
        ),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json_value)
                .collect::<Result<_, String>>()?,
        ),
        scalar => serde_json::to_value(&scalar).map_err(|e| e.to_string())?,
    };
    Ok(value)
}

fn mapping_key(key: serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("mapping key must be a scalar, found {other:?}")),
    }
}
