//! Build the runtime model from entity descriptors.

use crate::case::{humanize, pluralize};
use crate::config::resolved::{ResolvedEntity, ResolvedField, ResolvedModel};
use crate::config::{validate, EntityConfig, PK_COLUMN};
use crate::error::ConfigError;
use std::collections::HashMap;

/// Build resolved model from descriptors. Validates first.
pub fn resolve(entities: &[EntityConfig]) -> Result<ResolvedModel, ConfigError> {
    validate(entities)?;

    let mut resolved = Vec::with_capacity(entities.len());
    let mut entity_by_path = HashMap::new();

    for e in entities {
        let fields: Vec<ResolvedField> = e
            .fields
            .iter()
            .map(|f| ResolvedField {
                name: f.name.clone(),
                label: f.label.clone().unwrap_or_else(|| humanize(&f.name)),
                field_type: f.field_type.clone(),
                unique: f.unique,
                required: !f.blank,
            })
            .collect();
        let verbose_name = e.verbose_name.clone().unwrap_or_else(|| humanize(&e.id));
        let verbose_name_plural = e
            .verbose_name_plural
            .clone()
            .unwrap_or_else(|| pluralize(&verbose_name));
        let display_field = e
            .display_field
            .clone()
            .unwrap_or_else(|| fields[0].name.clone());

        let entity = ResolvedEntity {
            id: e.id.clone(),
            table_name: e.table_name.clone(),
            path_segment: e.path_segment.clone(),
            verbose_name,
            verbose_name_plural,
            pk_column: PK_COLUMN.to_string(),
            fields,
            display_field,
        };
        entity_by_path.insert(e.path_segment.clone(), entity.clone());
        resolved.push(entity);
    }

    Ok(ResolvedModel {
        entities: resolved,
        entity_by_path,
    })
}

/// Collects entity descriptors for the admin. `register` is the one-line hook per model.
#[derive(Default)]
pub struct ModelRegistry {
    entities: Vec<EntityConfig>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, entity: EntityConfig) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn resolve(&self) -> Result<ResolvedModel, ConfigError> {
        resolve(&self.entities)
    }
}
