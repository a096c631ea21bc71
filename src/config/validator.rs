//! Descriptor validation: identifiers, field uniqueness and cross references.

use crate::config::{EntityConfig, FieldType};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Primary key column added to every table.
pub const PK_COLUMN: &str = "id";

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("static identifier pattern"))
}

fn check_identifier(kind: &'static str, name: &str) -> Result<(), ConfigError> {
    if identifier_re().is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        })
    }
}

pub fn validate(entities: &[EntityConfig]) -> Result<(), ConfigError> {
    let mut path_segments = HashSet::new();
    for e in entities {
        check_identifier("entity", &e.id)?;
        check_identifier("table", &e.table_name)?;
        check_identifier("path segment", &e.path_segment)?;
        if e.fields.is_empty() {
            return Err(ConfigError::Validation(format!("entity '{}' has no fields", e.id)));
        }

        let mut names = HashSet::new();
        for f in &e.fields {
            check_identifier("field", &f.name)?;
            if f.name == PK_COLUMN || !names.insert(f.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    entity: e.id.clone(),
                    field: f.name.clone(),
                });
            }
            match f.field_type {
                FieldType::Text { max_length: 0 } => {
                    return Err(ConfigError::Validation(format!(
                        "{}.{}: max_length must be positive",
                        e.id, f.name
                    )));
                }
                // Text stores blanks as ''. Integers have no empty value.
                FieldType::Integer if f.blank => {
                    return Err(ConfigError::Validation(format!(
                        "{}.{}: integer fields cannot be blank",
                        e.id, f.name
                    )));
                }
                _ => {}
            }
        }

        if let Some(display) = &e.display_field {
            if !names.contains(display.as_str()) {
                return Err(ConfigError::MissingReference {
                    kind: "display field",
                    id: format!("{}.{}", e.id, display),
                });
            }
        }

        if !path_segments.insert(e.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(e.path_segment.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;

    fn entity(id: &str, path: &str) -> EntityConfig {
        EntityConfig {
            id: id.into(),
            table_name: format!("{}s", id),
            path_segment: path.into(),
            verbose_name: None,
            verbose_name_plural: None,
            display_field: None,
            fields: vec![FieldConfig::text("code", 10).unique(), FieldConfig::integer("score")],
        }
    }

    #[test]
    fn accepts_well_formed_entities() {
        assert!(validate(&[entity("student", "students"), entity("course", "courses")]).is_ok());
    }

    #[test]
    fn rejects_duplicate_path_segment() {
        let err = validate(&[entity("student", "people"), entity("teacher", "people")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePathSegment(p) if p == "people"));
    }

    #[test]
    fn rejects_field_named_like_the_primary_key() {
        let mut e = entity("student", "students");
        e.fields.push(FieldConfig::integer("id"));
        assert!(matches!(validate(&[e]), Err(ConfigError::DuplicateField { .. })));
    }

    #[test]
    fn rejects_bad_identifiers() {
        let mut e = entity("student", "students");
        e.table_name = "students; DROP TABLE x".into();
        assert!(matches!(
            validate(&[e]),
            Err(ConfigError::InvalidIdentifier { kind: "table", .. })
        ));
    }

    #[test]
    fn rejects_unknown_display_field() {
        let mut e = entity("student", "students");
        e.display_field = Some("nickname".into());
        assert!(matches!(validate(&[e]), Err(ConfigError::MissingReference { .. })));
    }

    #[test]
    fn rejects_blank_integer() {
        let mut e = entity("student", "students");
        e.fields[1].blank = true;
        assert!(matches!(validate(&[e]), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_zero_max_length() {
        let mut e = entity("student", "students");
        e.fields.push(FieldConfig::text("empty", 0));
        assert!(matches!(validate(&[e]), Err(ConfigError::Validation(_))));
    }
}
