//! Builds parameterized CREATE TABLE, SELECT, INSERT, UPDATE, DELETE from a resolved entity.

use crate::config::{FieldType, ResolvedEntity};
use crate::sql::FieldValue;
use crate::store::DatabaseKind;

/// Quote identifier (safe: only from validated descriptors).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: FieldValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Primary key followed by every field, in declaration order.
fn select_column_list(entity: &ResolvedEntity) -> String {
    std::iter::once(entity.pk_column.as_str())
        .chain(entity.fields.iter().map(|f| f.name.as_str()))
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Text { max_length } => format!("VARCHAR({})", max_length),
        FieldType::Integer => "BIGINT".to_string(),
    }
}

pub fn create_table(entity: &ResolvedEntity, kind: DatabaseKind) -> String {
    let pk = match kind {
        DatabaseKind::Postgres => "BIGSERIAL PRIMARY KEY",
        DatabaseKind::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
    };
    let mut columns = vec![format!("{} {}", quoted(&entity.pk_column), pk)];
    for f in &entity.fields {
        let mut def = format!("{} {} NOT NULL", quoted(&f.name), column_type(&f.field_type));
        if f.unique {
            def.push_str(" UNIQUE");
        }
        columns.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(&entity.table_name),
        columns.join(", ")
    )
}

/// Every row, oldest first.
pub fn select_all(entity: &ResolvedEntity) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(entity),
        quoted(&entity.table_name),
        quoted(&entity.pk_column)
    );
    q
}

pub fn select_by_id(entity: &ResolvedEntity, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(FieldValue::Integer(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(entity),
        quoted(&entity.table_name),
        quoted(&entity.pk_column),
        n
    );
    q
}

pub fn count(entity: &ResolvedEntity) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(&entity.table_name));
    q
}

/// Counts rows holding `value` in `column`, skipping the row `exclude_id` (the one being edited).
pub fn count_with_value(
    entity: &ResolvedEntity,
    column: &str,
    value: &FieldValue,
    exclude_id: Option<i64>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(value.clone());
    let mut sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ${}",
        quoted(&entity.table_name),
        quoted(column),
        n
    );
    if let Some(id) = exclude_id {
        let n = q.push_param(FieldValue::Integer(id));
        sql.push_str(&format!(" AND {} <> ${}", quoted(&entity.pk_column), n));
    }
    q.sql = sql;
    q
}

/// INSERT ... RETURNING all columns. `values` must be in field order (as produced by the form cleaner).
pub fn insert(entity: &ResolvedEntity, values: &[(String, FieldValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, v) in values {
        cols.push(quoted(col));
        placeholders.push(format!("${}", q.push_param(v.clone())));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(&entity.table_name),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(entity)
    );
    q
}

pub fn update(entity: &ResolvedEntity, id: i64, values: &[(String, FieldValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v.clone());
        sets.push(format!("{} = ${}", quoted(col), n));
    }
    let n = q.push_param(FieldValue::Integer(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(&entity.table_name),
        sets.join(", "),
        quoted(&entity.pk_column),
        n,
        select_column_list(entity)
    );
    q
}

pub fn delete(entity: &ResolvedEntity, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(FieldValue::Integer(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        quoted(&entity.table_name),
        quoted(&entity.pk_column),
        n,
        select_column_list(entity)
    );
    q
}
