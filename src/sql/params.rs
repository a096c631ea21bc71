//! Typed values bound to statements and read back from rows.

use crate::config::{FieldType, ResolvedField};
use serde::Serialize;
use sqlx::any::AnyRow;
use sqlx::{Any, Database, Row};
use std::fmt;

pub type AnyQuery<'q> = sqlx::query::Query<'q, Any, <Any as Database>::Arguments<'q>>;

/// A column value. Only the two field types descriptors can declare.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    /// Read the named column from a row using the field's declared type.
    pub fn from_row(row: &AnyRow, field: &ResolvedField) -> Result<Self, sqlx::Error> {
        Ok(match field.field_type {
            FieldType::Integer => FieldValue::Integer(row.try_get::<i64, _>(field.name.as_str())?),
            FieldType::Text { .. } => FieldValue::Text(row.try_get::<String, _>(field.name.as_str())?),
        })
    }

    pub fn bind<'q>(&self, query: AnyQuery<'q>) -> AnyQuery<'q> {
        match self {
            FieldValue::Integer(n) => query.bind(*n),
            FieldValue::Text(s) => query.bind(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}
