//! Generic CRUD execution for any resolved entity.

use crate::config::ResolvedEntity;
use crate::error::AppError;
use crate::sql::{self, AnyQuery, FieldValue, QueryBuf};
use crate::store::DatabaseConnection;
use sqlx::any::AnyRow;
use sqlx::Row;

/// One row: primary key plus field values aligned with `entity.fields`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub values: Vec<FieldValue>,
}

impl Record {
    fn from_row(row: &AnyRow, entity: &ResolvedEntity) -> Result<Self, sqlx::Error> {
        let id = row.try_get::<i64, _>(entity.pk_column.as_str())?;
        let values = entity
            .fields
            .iter()
            .map(|f| FieldValue::from_row(row, f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Record { id, values })
    }

    pub fn get(&self, entity: &ResolvedEntity, name: &str) -> Option<&FieldValue> {
        let idx = entity.fields.iter().position(|f| f.name == name)?;
        self.values.get(idx)
    }

    /// Display string: the entity's display field.
    pub fn display(&self, entity: &ResolvedEntity) -> String {
        self.get(entity, &entity.display_field)
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("{} object ({})", entity.verbose_name, self.id))
    }
}

pub struct CrudService;

impl CrudService {
    /// Every row, insertion order. No filters, no paging.
    pub async fn list(db: &DatabaseConnection, entity: &ResolvedEntity) -> Result<Vec<Record>, AppError> {
        let q = sql::select_all(entity);
        Self::fetch_all(db, entity, &q).await
    }

    pub async fn read(
        db: &DatabaseConnection,
        entity: &ResolvedEntity,
        id: i64,
    ) -> Result<Option<Record>, AppError> {
        let q = sql::select_by_id(entity, id);
        Self::fetch_optional(db, entity, &q).await
    }

    pub async fn count(db: &DatabaseConnection, entity: &ResolvedEntity) -> Result<i64, AppError> {
        let q = sql::count(entity);
        Self::fetch_count(db, &q).await
    }

    /// Insert one row. A unique-constraint violation is `AppError::Conflict`.
    pub async fn create(
        db: &DatabaseConnection,
        entity: &ResolvedEntity,
        values: &[(String, FieldValue)],
    ) -> Result<Record, AppError> {
        let q = sql::insert(entity, values);
        let row = Self::fetch_optional(db, entity, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(entity = %entity.id, id = row.id, "created");
        Ok(row)
    }

    /// Update one row by id. `None` when the id does not exist.
    pub async fn update(
        db: &DatabaseConnection,
        entity: &ResolvedEntity,
        id: i64,
        values: &[(String, FieldValue)],
    ) -> Result<Option<Record>, AppError> {
        let q = sql::update(entity, id, values);
        let row = Self::fetch_optional(db, entity, &q).await?;
        if row.is_some() {
            tracing::info!(entity = %entity.id, id, "updated");
        }
        Ok(row)
    }

    /// Delete one row by id. Returns the deleted row or `None`.
    pub async fn delete(
        db: &DatabaseConnection,
        entity: &ResolvedEntity,
        id: i64,
    ) -> Result<Option<Record>, AppError> {
        let q = sql::delete(entity, id);
        let row = Self::fetch_optional(db, entity, &q).await?;
        if row.is_some() {
            tracing::info!(entity = %entity.id, id, "deleted");
        }
        Ok(row)
    }

    /// Names of unique fields whose submitted value is already taken by another row.
    pub async fn unique_conflicts(
        db: &DatabaseConnection,
        entity: &ResolvedEntity,
        values: &[(String, FieldValue)],
        exclude_id: Option<i64>,
    ) -> Result<Vec<String>, AppError> {
        let mut taken = Vec::new();
        for field in entity.unique_fields() {
            let Some((_, value)) = values.iter().find(|(name, _)| *name == field.name) else {
                continue;
            };
            let q = sql::count_with_value(entity, &field.name, value, exclude_id);
            if Self::fetch_count(db, &q).await? > 0 {
                taken.push(field.name.clone());
            }
        }
        Ok(taken)
    }

    fn build(q: &QueryBuf) -> AnyQuery<'_> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = p.bind(query);
        }
        query
    }

    async fn fetch_all(
        db: &DatabaseConnection,
        entity: &ResolvedEntity,
        q: &QueryBuf,
    ) -> Result<Vec<Record>, AppError> {
        let rows = Self::build(q).fetch_all(&db.pool).await?;
        rows.iter()
            .map(|r| Record::from_row(r, entity).map_err(AppError::from))
            .collect()
    }

    async fn fetch_optional(
        db: &DatabaseConnection,
        entity: &ResolvedEntity,
        q: &QueryBuf,
    ) -> Result<Option<Record>, AppError> {
        let row = Self::build(q).fetch_optional(&db.pool).await?;
        row.map(|r| Record::from_row(&r, entity).map_err(AppError::from))
            .transpose()
    }

    async fn fetch_count(db: &DatabaseConnection, q: &QueryBuf) -> Result<i64, AppError> {
        let row = Self::build(q).fetch_one(&db.pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}
