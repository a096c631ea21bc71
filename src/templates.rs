//! Askama page templates and their view models.

use crate::config::{FieldType, ResolvedEntity};
use crate::model::Student;
use crate::service::{FormErrors, Record};
use askama::Template;
use std::collections::HashMap;

#[derive(Template)]
#[template(path = "listing.html")]
pub struct ListingPage {
    pub students: Vec<Student>,
}

pub struct EntityLink {
    pub path_segment: String,
    pub verbose_name_plural: String,
    pub count: i64,
}

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct AdminIndexPage {
    pub username: Option<String>,
    pub entities: Vec<EntityLink>,
}

pub struct ChangelistRow {
    pub id: i64,
    pub display: String,
    pub cells: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin/changelist.html")]
pub struct ChangelistPage {
    pub path_segment: String,
    pub verbose_name: String,
    pub verbose_name_plural: String,
    pub count_label: String,
    pub columns: Vec<String>,
    pub rows: Vec<ChangelistRow>,
}

impl ChangelistPage {
    pub fn new(entity: &ResolvedEntity, records: &[Record]) -> Self {
        let count_label = if records.len() == 1 {
            entity.verbose_name.to_lowercase()
        } else {
            entity.verbose_name_plural.to_lowercase()
        };
        ChangelistPage {
            path_segment: entity.path_segment.clone(),
            verbose_name: entity.verbose_name.clone(),
            verbose_name_plural: entity.verbose_name_plural.clone(),
            count_label,
            columns: entity.fields.iter().map(|f| f.label.clone()).collect(),
            rows: records
                .iter()
                .map(|r| ChangelistRow {
                    id: r.id,
                    display: r.display(entity),
                    cells: r.values.iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }
}

pub struct FormFieldView {
    pub name: String,
    pub label: String,
    pub input_type: &'static str,
    pub value: String,
    pub max_length: Option<u32>,
    pub required: bool,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin/change_form.html")]
pub struct ChangeFormPage {
    pub title: String,
    pub path_segment: String,
    pub verbose_name_plural: String,
    pub action: String,
    pub record_id: Option<i64>,
    pub non_field_errors: Vec<String>,
    pub fields: Vec<FormFieldView>,
}

impl ChangeFormPage {
    /// Blank add form.
    pub fn add(entity: &ResolvedEntity) -> Self {
        Self::bound(entity, None, &HashMap::new(), &FormErrors::default())
    }

    /// Change form prefilled from a stored row.
    pub fn change(entity: &ResolvedEntity, record: &Record) -> Self {
        let data = entity
            .fields
            .iter()
            .zip(&record.values)
            .map(|(f, v)| (f.name.clone(), v.to_string()))
            .collect();
        Self::bound(entity, Some(record.id), &data, &FormErrors::default())
    }

    /// Re-display of submitted data with errors inline.
    pub fn bound(
        entity: &ResolvedEntity,
        record_id: Option<i64>,
        data: &HashMap<String, String>,
        errors: &FormErrors,
    ) -> Self {
        let (title, action) = match record_id {
            Some(id) => (
                format!("Change {}", entity.verbose_name.to_lowercase()),
                format!("/admin/{}/{}/change", entity.path_segment, id),
            ),
            None => (
                format!("Add {}", entity.verbose_name.to_lowercase()),
                format!("/admin/{}/add", entity.path_segment),
            ),
        };
        let fields = entity
            .fields
            .iter()
            .map(|f| FormFieldView {
                name: f.name.clone(),
                label: f.label.clone(),
                input_type: match f.field_type {
                    FieldType::Integer => "number",
                    FieldType::Text { .. } => "text",
                },
                value: data.get(&f.name).cloned().unwrap_or_default(),
                max_length: f.max_length(),
                required: f.required,
                errors: errors.for_field(&f.name).to_vec(),
            })
            .collect();
        ChangeFormPage {
            title,
            path_segment: entity.path_segment.clone(),
            verbose_name_plural: entity.verbose_name_plural.clone(),
            action,
            record_id,
            non_field_errors: errors.non_field.clone(),
            fields,
        }
    }
}

#[derive(Template)]
#[template(path = "admin/delete_confirm.html")]
pub struct DeleteConfirmPage {
    pub path_segment: String,
    pub verbose_name: String,
    pub verbose_name_plural: String,
    pub id: i64,
    pub display: String,
}

impl DeleteConfirmPage {
    pub fn new(entity: &ResolvedEntity, record: &Record) -> Self {
        DeleteConfirmPage {
            path_segment: entity.path_segment.clone(),
            verbose_name: entity.verbose_name.to_lowercase(),
            verbose_name_plural: entity.verbose_name_plural.clone(),
            id: record.id,
            display: record.display(entity),
        }
    }
}
