//! Student result manager: a public listing page and a generated admin over one
//! declaratively described table.

pub mod auth;
pub mod case;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;
pub mod templates;

pub use config::{resolve, EntityConfig, ModelRegistry, ResolvedEntity, ResolvedModel};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::Student;
pub use routes::app;
pub use service::CrudService;
pub use settings::Settings;
pub use state::AppState;
pub use store::{ensure_database_exists, DatabaseConnection, DatabaseKind};
