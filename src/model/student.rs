//! The Student record: roll number, name, branch and marks.

use crate::config::{EntityConfig, FieldConfig, ModelRegistry, ResolvedEntity};
use crate::error::AppError;
use crate::sql::select_all;
use crate::store::DatabaseConnection;

pub const ENTITY_ID: &str = "student";

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub roll_no: String,
    pub name: String,
    pub branch: String,
    pub marks: i64,
}

impl Student {
    pub fn entity_config() -> EntityConfig {
        EntityConfig {
            id: ENTITY_ID.into(),
            table_name: "students".into(),
            path_segment: "students".into(),
            verbose_name: None,
            verbose_name_plural: None,
            display_field: Some("name".into()),
            fields: vec![
                FieldConfig::text("roll_no", 10).unique(),
                FieldConfig::text("name", 100),
                FieldConfig::text("branch", 50),
                FieldConfig::integer("marks"),
            ],
        }
    }

    /// All students in insertion order.
    pub async fn all(db: &DatabaseConnection, entity: &ResolvedEntity) -> Result<Vec<Student>, AppError> {
        let q = select_all(entity);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query_as::<_, Student>(&q.sql).fetch_all(&db.pool).await?;
        Ok(rows)
    }
}

/// Models exposed through the admin.
pub fn registry() -> ModelRegistry {
    ModelRegistry::new().register(Student::entity_config())
}
