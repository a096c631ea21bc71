//! Database connection, backend detection, and the `admin_users` table.

use crate::error::{AppError, ConfigError};
use sqlx::any::{self, AnyPoolOptions};
use sqlx::{AnyPool, ConnectOptions};
use std::path::Path;
use std::str::FromStr;

/// Used when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://db.sqlite3?mode=rwc";

pub const ADMIN_USERS_TABLE: &str = "admin_users";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Sqlite,
    Postgres,
}

impl DatabaseKind {
    pub fn from_url(url: &str) -> Result<Self, AppError> {
        if url.starts_with("sqlite:") {
            Ok(DatabaseKind::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DatabaseKind::Postgres)
        } else {
            Err(ConfigError::Load(format!("unsupported DATABASE_URL: {}", url)).into())
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::Sqlite => "sqlite",
            DatabaseKind::Postgres => "postgres",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pub pool: AnyPool,
    pub kind: DatabaseKind,
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl DatabaseConnection {
    /// Connect through the `Any` driver. In-memory SQLite is pinned to one connection
    /// that never expires, since every new connection would see an empty database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let kind = DatabaseKind::from_url(url)?;
        any::install_default_drivers();
        let options = any::AnyConnectOptions::from_str(url)?.disable_statement_logging();
        let pool_options = if kind == DatabaseKind::Sqlite && is_in_memory(url) {
            AnyPoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            AnyPoolOptions::new().max_connections(max_connections)
        };
        let pool = pool_options.connect_with(options).await?;
        tracing::info!(kind = ?kind, "connected to database");
        Ok(Self { pool, kind })
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Make sure the target of `database_url` can be opened. Postgres: connect to the default
/// `postgres` database and CREATE DATABASE if missing. SQLite file: create the parent directory.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    match DatabaseKind::from_url(database_url)? {
        DatabaseKind::Postgres => ensure_postgres_database(database_url).await,
        DatabaseKind::Sqlite => {
            if is_in_memory(database_url) {
                return Ok(());
            }
            if let Some(parent) = sqlite_file_path(database_url).and_then(|p| p.parent()) {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| ConfigError::Load(format!("cannot create {}: {}", parent.display(), e)))?;
                }
            }
            Ok(())
        }
    }
}

fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or("");
    if path.is_empty() {
        None
    } else {
        Some(Path::new(path))
    }
}

async fn ensure_postgres_database(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::Load(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| ConfigError::Load("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn admin_users_ddl(kind: DatabaseKind) -> String {
    let pk = match kind {
        DatabaseKind::Postgres => "BIGSERIAL PRIMARY KEY",
        DatabaseKind::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
    };
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id {}, username VARCHAR(150) NOT NULL UNIQUE, password_hash TEXT NOT NULL)",
        ADMIN_USERS_TABLE, pk
    )
}

/// Insert an admin account. A taken username is `AppError::Conflict`.
pub async fn insert_admin_user(
    db: &DatabaseConnection,
    username: &str,
    password_hash: &str,
) -> Result<i64, AppError> {
    let row: (i64,) = sqlx::query_as(&format!(
        "INSERT INTO {} (username, password_hash) VALUES ($1, $2) RETURNING id",
        ADMIN_USERS_TABLE
    ))
    .bind(username.to_string())
    .bind(password_hash.to_string())
    .fetch_one(&db.pool)
    .await?;
    Ok(row.0)
}

pub async fn admin_password_hash(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<String>, AppError> {
    let row: Option<(String,)> = sqlx::query_as(&format!(
        "SELECT password_hash FROM {} WHERE username = $1",
        ADMIN_USERS_TABLE
    ))
    .bind(username.to_string())
    .fetch_optional(&db.pool)
    .await?;
    Ok(row.map(|r| r.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_backend_from_scheme() {
        assert_eq!(DatabaseKind::from_url("sqlite::memory:").unwrap(), DatabaseKind::Sqlite);
        assert_eq!(DatabaseKind::from_url(DEFAULT_DATABASE_URL).unwrap(), DatabaseKind::Sqlite);
        assert_eq!(
            DatabaseKind::from_url("postgres://u:p@localhost/results").unwrap(),
            DatabaseKind::Postgres
        );
        assert!(matches!(
            DatabaseKind::from_url("mysql://localhost/x"),
            Err(AppError::Config(ConfigError::Load(_)))
        ));
    }

    #[tokio::test]
    async fn unusable_sqlite_directory_is_a_load_error() {
        let blocker = std::env::temp_dir().join(format!("student-results-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"not a directory").unwrap();
        let url = format!("sqlite://{}/nested/db.sqlite3?mode=rwc", blocker.display());
        let err = ensure_database_exists(&url).await.unwrap_err();
        std::fs::remove_file(&blocker).unwrap();
        assert!(matches!(err, AppError::Config(ConfigError::Load(_))), "got {:?}", err);
    }

    #[test]
    fn postgres_admin_url() {
        let (admin, name) = parse_db_name_from_url("postgres://u:p@localhost:5432/results?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "results");
    }

    #[test]
    fn sqlite_paths() {
        assert_eq!(sqlite_file_path("sqlite://data/db.sqlite3?mode=rwc"), Some(Path::new("data/db.sqlite3")));
        assert_eq!(sqlite_file_path("sqlite:db.sqlite3"), Some(Path::new("db.sqlite3")));
        assert!(is_in_memory("sqlite::memory:"));
        assert!(!is_in_memory(DEFAULT_DATABASE_URL));
    }

    #[tokio::test]
    async fn admin_users_round_trip_in_memory() {
        let db = DatabaseConnection::connect("sqlite::memory:", 5).await.unwrap();
        sqlx::query(&admin_users_ddl(db.kind)).execute(&db.pool).await.unwrap();

        insert_admin_user(&db, "admin", "hash-1").await.unwrap();
        assert_eq!(admin_password_hash(&db, "admin").await.unwrap().as_deref(), Some("hash-1"));
        assert_eq!(admin_password_hash(&db, "nobody").await.unwrap(), None);

        let dup = insert_admin_user(&db, "admin", "hash-2").await.unwrap_err();
        assert!(matches!(dup, AppError::Conflict(_)));
    }
}
