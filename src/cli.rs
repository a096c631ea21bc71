//! Command line: serve (default), migrate, create-superuser.

use crate::auth::create_superuser;
use crate::config::ResolvedModel;
use crate::migration::apply_migrations;
use crate::model::student;
use crate::routes;
use crate::settings::Settings;
use crate::state::AppState;
use crate::store::{ensure_database_exists, DatabaseConnection};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Student result manager: public listing plus a generated admin.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Apply migrations and serve HTTP
    Serve {
        /// Listen address; overrides BIND_ADDR
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Create tables for every registered entity and exit
    Migrate,
    /// Add an admin account
    CreateSuperuser {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve { bind: None })
    }
}

/// Connect, migrate, then run the chosen command.
pub async fn run(cli: Cli, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let model: ResolvedModel = student::registry().resolve()?;
    ensure_database_exists(&settings.database_url).await?;
    let db = DatabaseConnection::connect(&settings.database_url, settings.db_max_connections).await?;
    apply_migrations(&db, &model).await?;

    match cli.command() {
        // Migrations already ran above.
        Command::Migrate => {}
        Command::CreateSuperuser { username, password } => {
            create_superuser(&db, &username, &password).await?;
        }
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(settings.bind_addr);
            if !settings.admin_auth {
                tracing::warn!("ADMIN_AUTH is off; /admin is open to anyone");
            }
            let app = routes::app(AppState::new(db, model, settings.admin_auth));
            let listener = TcpListener::bind(addr).await?;
            tracing::info!("listening on http://{}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}
