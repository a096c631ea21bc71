//! Raw entity descriptors: a table declared as a list of typed fields.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Text { max_length: u32 },
    Integer,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(default)]
    pub unique: bool,
    /// Allows an empty value. Fields are required unless this is set.
    #[serde(default)]
    pub blank: bool,
}

impl FieldConfig {
    pub fn text(name: &str, max_length: u32) -> Self {
        FieldConfig {
            name: name.to_string(),
            label: None,
            field_type: FieldType::Text { max_length },
            unique: false,
            blank: false,
        }
    }

    pub fn integer(name: &str) -> Self {
        FieldConfig {
            name: name.to_string(),
            label: None,
            field_type: FieldType::Integer,
            unique: false,
            blank: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityConfig {
    pub id: String,
    pub table_name: String,
    /// URL segment under `/admin/`.
    pub path_segment: String,
    #[serde(default)]
    pub verbose_name: Option<String>,
    #[serde(default)]
    pub verbose_name_plural: Option<String>,
    /// Field used as the row's display string. Defaults to the first field.
    #[serde(default)]
    pub display_field: Option<String>,
    pub fields: Vec<FieldConfig>,
}
