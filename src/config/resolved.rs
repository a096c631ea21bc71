//! Resolved entity model: descriptors validated and flattened for runtime use.

use crate::config::FieldType;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct ResolvedField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub unique: bool,
    pub required: bool,
}

impl ResolvedField {
    pub fn max_length(&self) -> Option<u32> {
        match self.field_type {
            FieldType::Text { max_length } => Some(max_length),
            FieldType::Integer => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedEntity {
    pub id: String,
    pub table_name: String,
    pub path_segment: String,
    pub verbose_name: String,
    pub verbose_name_plural: String,
    pub pk_column: String,
    /// Declaration order; also the column order of every statement and screen.
    pub fields: Vec<ResolvedField>,
    pub display_field: String,
}

impl ResolvedEntity {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().filter(|f| f.unique)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedModel {
    pub entities: Vec<ResolvedEntity>,
    pub entity_by_path: HashMap<String, ResolvedEntity>,
}

impl ResolvedModel {
    pub fn entity_by_path(&self, path: &str) -> Option<&ResolvedEntity> {
        self.entity_by_path.get(path)
    }

    pub fn entity_by_id(&self, id: &str) -> Option<&ResolvedEntity> {
        self.entities.iter().find(|e| e.id == id)
    }
}
