//! Form cleaning: turns submitted strings into typed values, collecting per-field errors.

use crate::config::{FieldType, ResolvedEntity, ResolvedField};
use crate::sql::FieldValue;
use std::collections::{BTreeMap, HashMap};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_AN_INTEGER: &str = "Enter a whole number.";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub non_field: Vec<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn for_field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub fn unique_message(entity: &ResolvedEntity, field: &ResolvedField) -> String {
    format!("{} with this {} already exists.", entity.verbose_name, field.label)
}

pub struct FormValidator;

impl FormValidator {
    /// Clean every declared field. Unknown keys in `data` are ignored.
    /// On success the values are in field declaration order.
    pub fn clean(
        entity: &ResolvedEntity,
        data: &HashMap<String, String>,
    ) -> Result<Vec<(String, FieldValue)>, FormErrors> {
        let mut errors = FormErrors::default();
        let mut values = Vec::with_capacity(entity.fields.len());
        for field in &entity.fields {
            match clean_field(field, data.get(&field.name).map(String::as_str)) {
                Ok(v) => values.push((field.name.clone(), v)),
                Err(msg) => errors.add(&field.name, msg),
            }
        }
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}

fn clean_field(field: &ResolvedField, raw: Option<&str>) -> Result<FieldValue, String> {
    let s = raw.unwrap_or("").trim();
    if s.is_empty() {
        if field.required {
            return Err(REQUIRED.to_string());
        }
        return Ok(FieldValue::Text(String::new()));
    }
    match field.field_type {
        FieldType::Text { max_length } => {
            let len = s.chars().count();
            if len > max_length as usize {
                return Err(format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    max_length, len
                ));
            }
            Ok(FieldValue::Text(s.to_string()))
        }
        FieldType::Integer => s
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| NOT_AN_INTEGER.to_string()),
    }
}
