//! # Instances and Serialization
//!
//! A validated payload, held in the field order of its model. Serializing
//! an [`Instance`] writes each field under its alias; absent fields become
//! `null` unless [`SerializeOptions::exclude_absent`] is set.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Value held by one instance field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Optional field not provided, or provided as `null`.
    Absent,
    /// Primitive value, including untyped lists.
    Scalar(Value),
    /// Nested model instance.
    Model(Instance),
    /// List of validated elements.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// True for [`FieldValue::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The primitive value, if this is one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The nested instance, if this is one.
    pub fn as_model(&self) -> Option<&Instance> {
        match self {
            Self::Model(instance) => Some(instance),
            _ => None,
        }
    }

    /// The list elements, if this is a typed list.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// One field of an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceField {
    /// Field name.
    pub name: String,
    /// Key written on serialization.
    pub alias: String,
    /// Validated value.
    pub value: FieldValue,
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    model: String,
    fields: Vec<InstanceField>,
}

/// Serializer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Leave absent fields out instead of writing `null`.
    pub exclude_absent: bool,
}

impl Instance {
    pub(crate) fn new(model: String, fields: Vec<InstanceField>) -> Self {
        Self { model, fields }
    }

    /// Name of the model this instance was validated against.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fields in model order.
    pub fn fields(&self) -> &[InstanceField] {
        &self.fields
    }

    /// Value of the field called `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Serialize to a JSON value with default options.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        self.to_value_with(SerializeOptions::default())
    }

    /// Serialize to a JSON value.
    pub fn to_value_with(&self, options: SerializeOptions) -> Result<Value, serde_json::Error> {
        serde_json::to_value(WithOptions {
            instance: self,
            options,
        })
    }

    /// Serialize to pretty-printed JSON text.
    pub fn to_json_string(&self, options: SerializeOptions) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&WithOptions {
            instance: self,
            options,
        })
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WithOptions {
            instance: self,
            options: SerializeOptions::default(),
        }
        .serialize(serializer)
    }
}

struct WithOptions<'a> {
    instance: &'a Instance,
    options: SerializeOptions,
}

impl Serialize for WithOptions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields: Vec<&InstanceField> = self
            .instance
            .fields
            .iter()
            .filter(|f| !(self.options.exclude_absent && f.value.is_absent()))
            .collect();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            map.serialize_entry(
                &field.alias,
                &ValueWithOptions {
                    value: &field.value,
                    options: self.options,
                },
            )?;
        }
        map.end()
    }
}

struct ValueWithOptions<'a> {
    value: &'a FieldValue,
    options: SerializeOptions,
}

impl Serialize for ValueWithOptions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            FieldValue::Absent => serializer.serialize_none(),
            FieldValue::Scalar(value) => value.serialize(serializer),
            FieldValue::Model(instance) => WithOptions {
                instance,
                options: self.options,
            }
            .serialize(serializer),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&ValueWithOptions {
                        value: item,
                        options: self.options,
                    })?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, value: FieldValue) -> InstanceField {
        InstanceField {
            name: name.into(),
            alias: name.into(),
            value,
        }
    }

    fn person() -> Instance {
        Instance::new(
            "Person".into(),
            vec![
                field("name", FieldValue::Scalar(json!("Ana"))),
                field("age", FieldValue::Absent),
                field(
                    "address",
                    FieldValue::Model(Instance::new(
                        "Address".into(),
                        vec![
                            field("city", FieldValue::Scalar(json!("Lisbon"))),
                            field("zip", FieldValue::Absent),
                        ],
                    )),
                ),
            ],
        )
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let value = person().to_value().unwrap();
        assert_eq!(
            value,
            json!({"name": "Ana", "age": null, "address": {"city": "Lisbon", "zip": null}})
        );
    }

    #[test]
    fn exclude_absent_drops_fields_at_every_depth() {
        let value = person()
            .to_value_with(SerializeOptions {
                exclude_absent: true,
            })
            .unwrap();
        assert_eq!(value, json!({"name": "Ana", "address": {"city": "Lisbon"}}));
    }

    #[test]
    fn keys_follow_field_order() {
        let text = serde_json::to_string(&person()).unwrap();
        let name_at = text.find("\"name\"").unwrap();
        let age_at = text.find("\"age\"").unwrap();
        let address_at = text.find("\"address\"").unwrap();
        assert!(name_at < age_at && age_at < address_at);
    }

    #[test]
    fn alias_is_the_written_key() {
        let instance = Instance::new(
            "M".into(),
            vec![InstanceField {
                name: "internal".into(),
                alias: "external".into(),
                value: FieldValue::Scalar(json!(1)),
            }],
        );
        assert_eq!(instance.to_value().unwrap(), json!({"external": 1}));
    }

    #[test]
    fn lists_serialize_elementwise() {
        let instance = Instance::new(
            "Team".into(),
            vec![field(
                "members",
                FieldValue::List(vec![
                    FieldValue::Model(Instance::new(
                        "Member".into(),
                        vec![field("id", FieldValue::Scalar(json!(1)))],
                    )),
                    FieldValue::Model(Instance::new(
                        "Member".into(),
                        vec![field("id", FieldValue::Scalar(json!(2)))],
                    )),
                ]),
            )],
        );
        assert_eq!(
            instance.to_value().unwrap(),
            json!({"members": [{"id": 1}, {"id": 2}]})
        );
    }

    #[test]
    fn accessors() {
        let p = person();
        assert_eq!(p.model(), "Person");
        let address = p.get("address").unwrap().as_model().unwrap();
        assert_eq!(address.model(), "Address");
        assert!(p.get("age").unwrap().is_absent());
        assert!(p.get("nope").is_none());
        assert!(p.get("name").unwrap().as_list().is_none());
    }
}
