//! # Payload Validation
//!
//! Checks a JSON payload against a [`ModelDescriptor`] and either returns a
//! populated [`Instance`] or every violation found.
//!
//! The checks themselves run on the `jsonschema` engine against the
//! descriptor's [`payload_schema`]. Once a payload passes, the descriptor
//! is walked a second time to build the alias-keyed [`Instance`].
//!
//! ## Rules
//!
//! - Keys are looked up by field alias. Undeclared keys are ignored.
//! - A missing or `null` optional field is absent. A missing or `null`
//!   required field is a violation.
//! - `string` needs a JSON string, `integer` an integral number, `number`
//!   any JSON number, `boolean` a JSON bool, and an untyped list any array.
//! - Nested models and lists of nested models are validated recursively.
//!
//! Validation never stops at the first problem. Each [`Violation`] carries
//! the JSON Pointer of the offending value, built from aliases and array
//! indices, and violations are reported in field order.

use std::fmt;

use dyntamic_core::{ModelDescriptor, ValueKind};
use jsonschema::error::ValidationErrorKind;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::instance::{FieldValue, Instance, InstanceField};
use crate::payload_schema::payload_schema;

/// Error returned when a payload does not fit a model.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The payload did not conform to the model.
    #[error("validation failed against model '{model}':\n{violations}")]
    ValidationFailed {
        /// Name of the model validated against.
        model: String,
        /// Every violation found.
        violations: ValidationViolations,
    },

    /// The payload text could not be parsed as JSON.
    #[error("payload is not valid JSON: {reason}")]
    InvalidJson {
        /// Parser message.
        reason: String,
    },

    /// The model's payload schema was rejected by the schema engine.
    #[error("cannot build validator for model '{model}': {reason}")]
    ValidatorBuild {
        /// Name of the model.
        model: String,
        /// Engine message.
        reason: String,
    },
}

impl ValidationError {
    /// The violations, if this is a `ValidationFailed`.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::ValidationFailed { violations, .. } => Some(violations),
            Self::InvalidJson { .. } | Self::ValidatorBuild { .. } => None,
        }
    }
}

/// One problem in a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending value; empty for the payload itself.
    pub instance_path: String,
    /// Alias of the field the value belongs to; empty at the root.
    pub field: String,
    /// What is wrong with the value.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "  {location}: {}", self.message)
    }
}

/// Violations of one payload, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// How many violations were found.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True when the payload had nothing wrong with it.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations, in field order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Take ownership of the violations.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Validates payloads against model descriptors.
///
/// Stateless; one validator can serve any number of models and threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelValidator;

impl ModelValidator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Validate a parsed payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ValidationFailed` with every violation if
    /// the payload does not conform.
    pub fn validate(&self, model: &ModelDescriptor, payload: &Value) -> Result<Instance, ValidationError> {
        let schema = payload_schema(model);
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts.build(&schema).map_err(|e| ValidationError::ValidatorBuild {
            model: model.name.clone(),
            reason: e.to_string(),
        })?;

        let mut located: Vec<(Vec<usize>, Violation)> = validator
            .iter_errors(payload)
            .map(|e| {
                let mut segments = pointer_segments(&e.instance_path.to_string());
                let message = match &e.kind {
                    ValidationErrorKind::Required { property } => {
                        segments.push(property.as_str().unwrap_or_default().to_string());
                        "missing required field".to_string()
                    }
                    ValidationErrorKind::Type { .. } if e.instance.is_null() => {
                        "value may not be null".to_string()
                    }
                    _ => e.to_string(),
                };
                let (field, position) = locate(model, &segments);
                let violation = Violation {
                    instance_path: to_pointer(&segments),
                    field,
                    message,
                };
                (position, violation)
            })
            .collect();

        if located.is_empty() {
            if let Value::Object(obj) = payload {
                tracing::debug!(model = %model.name, "payload validated");
                return Ok(build_instance(model, obj));
            }
        }

        // Stable: several violations at one value keep the engine's order.
        located.sort_by(|a, b| a.0.cmp(&b.0));
        let violations = ValidationViolations {
            violations: located.into_iter().map(|(_, v)| v).collect(),
        };
        tracing::debug!(
            model = %model.name,
            violations = violations.len(),
            "payload rejected"
        );
        Err(ValidationError::ValidationFailed {
            model: model.name.clone(),
            violations,
        })
    }

    /// Parse `text` as JSON, then [`validate`](Self::validate).
    pub fn validate_str(&self, model: &ModelDescriptor, text: &str) -> Result<Instance, ValidationError> {
        let payload: Value = serde_json::from_str(text).map_err(|e| ValidationError::InvalidJson {
            reason: e.to_string(),
        })?;
        self.validate(model, &payload)
    }
}

fn build_instance(model: &ModelDescriptor, obj: &Map<String, Value>) -> Instance {
    let fields = model
        .fields
        .iter()
        .map(|field| InstanceField {
            name: field.name.clone(),
            alias: field.alias.clone(),
            value: match obj.get(&field.alias) {
                None | Some(Value::Null) => FieldValue::Absent,
                Some(value) => build_value(&field.kind, value),
            },
        })
        .collect();
    Instance::new(model.name.clone(), fields)
}

// Only called on payloads the engine accepted, so shapes line up.
fn build_value(kind: &ValueKind, value: &Value) -> FieldValue {
    match (kind, value) {
        (ValueKind::Model(model), Value::Object(obj)) => FieldValue::Model(build_instance(model, obj)),
        (ValueKind::List(inner), Value::Array(items)) => {
            FieldValue::List(items.iter().map(|item| build_value(inner, item)).collect())
        }
        (_, value) => FieldValue::Scalar(value.clone()),
    }
}

/// Alias of the field a path points into, and its position in field order.
///
/// Each step contributes the field's index within its model, or the array
/// index within a list. Steps the descriptor does not know sort last.
fn locate(model: &ModelDescriptor, segments: &[String]) -> (String, Vec<usize>) {
    let mut alias = String::new();
    let mut position = Vec::with_capacity(segments.len());
    let mut current = Some(model);
    let mut kind: Option<&ValueKind> = None;

    for segment in segments {
        match current {
            Some(m) => match m.fields.iter().enumerate().find(|(_, f)| &f.alias == segment) {
                Some((index, field)) => {
                    alias = field.alias.clone();
                    position.push(index);
                    kind = Some(&field.kind);
                }
                None => {
                    position.push(usize::MAX);
                    break;
                }
            },
            None => match (kind, segment.parse::<usize>()) {
                (Some(ValueKind::List(inner)), Ok(index)) => {
                    position.push(index);
                    kind = Some(inner.as_ref());
                }
                _ => {
                    position.push(usize::MAX);
                    break;
                }
            },
        }
        current = match kind {
            Some(ValueKind::Model(m)) => Some(m),
            _ => None,
        };
    }
    (alias, position)
}

/// Split a JSON Pointer into unescaped segments (RFC 6901).
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Join unescaped segments into a JSON Pointer (RFC 6901).
fn to_pointer(segments: &[String]) -> String {
    segments
        .iter()
        .map(|s| format!("/{}", s.replace('~', "~0").replace('/', "~1")))
        .collect()
}
