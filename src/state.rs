//! Shared application state for all routes.

use crate::config::ResolvedModel;
use crate::store::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Entities registered with the admin. Fixed after startup.
    pub model: Arc<ResolvedModel>,
    /// Require HTTP Basic credentials on `/admin`.
    pub admin_auth: bool,
}

impl AppState {
    pub fn new(db: DatabaseConnection, model: ResolvedModel, admin_auth: bool) -> Self {
        Self {
            db,
            model: Arc::new(model),
            admin_auth,
        }
    }
}
