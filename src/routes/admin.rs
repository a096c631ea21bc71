//! Admin scaffold routes. Index and changelist answer with and without the trailing slash.

use crate::handlers::admin::{
    add, add_form, change, change_form, changelist, delete, delete_confirm, index,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/admin", get(index))
        .route("/admin/", get(index))
        .route("/admin/:path_segment", get(changelist))
        .route("/admin/:path_segment/", get(changelist))
        .route("/admin/:path_segment/add", get(add_form).post(add))
        .route("/admin/:path_segment/:id/change", get(change_form).post(change))
        .route("/admin/:path_segment/:id/delete", get(delete_confirm).post(delete))
        .with_state(state)
}
