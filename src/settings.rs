//! Runtime settings read from the environment (and `.env` via dotenvy).
//!
//! | Env Var              | Default                         |
//! |----------------------|---------------------------------|
//! | `DATABASE_URL`       | `sqlite://db.sqlite3?mode=rwc`  |
//! | `BIND_ADDR`          | `127.0.0.1:8000`                |
//! | `DEBUG`              | `false`                         |
//! | `DB_MAX_CONNECTIONS` | `5`                             |
//! | `ADMIN_AUTH`         | `true`                          |

use crate::error::ConfigError;
use crate::store::DEFAULT_DATABASE_URL;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub debug: bool,
    pub db_max_connections: u32,
    pub admin_auth: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or empty keys take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = parse("BIND_ADDR", get("BIND_ADDR").as_deref().unwrap_or(DEFAULT_BIND_ADDR))?;
        let debug = get("DEBUG").map(|v| parse_bool("DEBUG", &v)).transpose()?.unwrap_or(false);
        let db_max_connections = get("DB_MAX_CONNECTIONS")
            .map(|v| parse::<u32>("DB_MAX_CONNECTIONS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if db_max_connections == 0 {
            return Err(ConfigError::Load("DB_MAX_CONNECTIONS must be at least 1".into()));
        }
        let admin_auth = get("ADMIN_AUTH")
            .map(|v| parse_bool("ADMIN_AUTH", &v))
            .transpose()?
            .unwrap_or(true);

        Ok(Settings {
            database_url,
            bind_addr,
            debug,
            db_max_connections,
            admin_auth,
        })
    }

    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "student_results=debug,tower_http=debug"
        } else {
            "student_results=info,tower_http=info"
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ConfigError::Load(format!("{}={:?}: {}", key, value, e)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Load(format!("{}={:?}: expected a boolean", key, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.bind_addr, "127.0.0.1:8000".parse().unwrap());
        assert!(!s.debug);
        assert_eq!(s.db_max_connections, 5);
        assert!(s.admin_auth);
        assert_eq!(s.default_log_filter(), "student_results=info,tower_http=info");
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/results"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("DEBUG", "True"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("ADMIN_AUTH", "off"),
        ])
        .unwrap();
        assert_eq!(s.database_url, "postgres://localhost/results");
        assert_eq!(s.bind_addr.port(), 9000);
        assert!(s.debug);
        assert_eq!(s.db_max_connections, 12);
        assert!(!s.admin_auth);
        assert!(s.default_log_filter().contains("debug"));
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let s = settings(&[("DATABASE_URL", "  "), ("DEBUG", "")]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert!(!s.debug);
    }

    #[test]
    fn invalid_values_are_load_errors() {
        assert!(matches!(settings(&[("BIND_ADDR", "nowhere")]), Err(ConfigError::Load(_))));
        assert!(matches!(settings(&[("DEBUG", "maybe")]), Err(ConfigError::Load(_))));
        assert!(matches!(settings(&[("DB_MAX_CONNECTIONS", "-1")]), Err(ConfigError::Load(_))));
        assert!(matches!(settings(&[("DB_MAX_CONNECTIONS", "0")]), Err(ConfigError::Load(_))));
    }
}
