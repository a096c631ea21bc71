//! Apply the resolved model to the database: one table per entity plus `admin_users`.
//! Every statement is CREATE ... IF NOT EXISTS, so this runs on every startup.

use crate::config::ResolvedModel;
use crate::error::AppError;
use crate::sql::create_table;
use crate::store::{admin_users_ddl, DatabaseConnection};

pub async fn apply_migrations(db: &DatabaseConnection, model: &ResolvedModel) -> Result<(), AppError> {
    for entity in &model.entities {
        let ddl = create_table(entity, db.kind);
        tracing::debug!(sql = %ddl, "migrate");
        sqlx::query(&ddl).execute(&db.pool).await?;
    }
    sqlx::query(&admin_users_ddl(db.kind)).execute(&db.pool).await?;
    tracing::info!(tables = model.entities.len() + 1, "migrations applied");
    Ok(())
}
