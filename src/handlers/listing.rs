//! The public page: every student in one table.

use crate::error::{AppError, ConfigError};
use crate::handlers::render;
use crate::model::{student, Student};
use crate::state::AppState;
use crate::templates::ListingPage;
use axum::{extract::State, response::Html};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let entity = state
        .model
        .entity_by_id(student::ENTITY_ID)
        .ok_or_else(|| ConfigError::MissingReference {
            kind: "entity",
            id: student::ENTITY_ID.into(),
        })?;
    let students = Student::all(&state.db, entity).await?;
    render(&ListingPage { students })
}
