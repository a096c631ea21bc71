//! Admin scaffold handlers: index, changelist, add, change, delete.
//! Every handler resolves the entity from the path segment, so one set of handlers serves all
//! registered models.

use crate::auth::AdminUser;
use crate::config::ResolvedEntity;
use crate::error::AppError;
use crate::handlers::render;
use crate::service::{unique_message, CrudService, FormErrors, FormValidator};
use crate::sql::FieldValue;
use crate::state::AppState;
use crate::templates::{AdminIndexPage, ChangeFormPage, ChangelistPage, DeleteConfirmPage, EntityLink};
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::collections::HashMap;

fn entity_for<'a>(state: &'a AppState, path_segment: &str) -> Result<&'a ResolvedEntity, AppError> {
    state
        .model
        .entity_by_path(path_segment)
        .ok_or_else(|| AppError::NotFound(path_segment.to_string()))
}

fn changelist_url(entity: &ResolvedEntity) -> String {
    format!("/admin/{}/", entity.path_segment)
}

fn missing(entity: &ResolvedEntity, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id {}", entity.verbose_name, id))
}

/// An id that does not parse as i64 is an unknown id.
fn parse_id(entity: &ResolvedEntity, raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| missing(entity, raw))
}

pub async fn index(admin: AdminUser, State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut entities = Vec::with_capacity(state.model.entities.len());
    for entity in &state.model.entities {
        entities.push(EntityLink {
            path_segment: entity.path_segment.clone(),
            verbose_name_plural: entity.verbose_name_plural.clone(),
            count: CrudService::count(&state.db, entity).await?,
        });
    }
    render(&AdminIndexPage {
        username: admin.username,
        entities,
    })
}

pub async fn changelist(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<Html<String>, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let records = CrudService::list(&state.db, entity).await?;
    render(&ChangelistPage::new(entity, &records))
}

pub async fn add_form(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<Html<String>, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    render(&ChangeFormPage::add(entity))
}

pub async fn add(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Form(data): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    save(&state, entity, None, data).await
}

pub async fn change_form(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((path_segment, raw_id)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let id = parse_id(entity, &raw_id)?;
    let record = CrudService::read(&state.db, entity, id)
        .await?
        .ok_or_else(|| missing(entity, id))?;
    render(&ChangeFormPage::change(entity, &record))
}

pub async fn change(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((path_segment, raw_id)): Path<(String, String)>,
    Form(data): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let id = parse_id(entity, &raw_id)?;
    if CrudService::read(&state.db, entity, id).await?.is_none() {
        return Err(missing(entity, id));
    }
    save(&state, entity, Some(id), data).await
}

pub async fn delete_confirm(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((path_segment, raw_id)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let id = parse_id(entity, &raw_id)?;
    let record = CrudService::read(&state.db, entity, id)
        .await?
        .ok_or_else(|| missing(entity, id))?;
    render(&DeleteConfirmPage::new(entity, &record))
}

pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((path_segment, raw_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let id = parse_id(entity, &raw_id)?;
    CrudService::delete(&state.db, entity, id)
        .await?
        .ok_or_else(|| missing(entity, id))?;
    Ok(Redirect::to(&changelist_url(entity)).into_response())
}

/// Clean, check uniqueness, then insert (`id == None`) or update. Any failure re-renders the
/// bound form with inline errors and leaves the store untouched.
async fn save(
    state: &AppState,
    entity: &ResolvedEntity,
    id: Option<i64>,
    data: HashMap<String, String>,
) -> Result<Response, AppError> {
    let values = match FormValidator::clean(entity, &data) {
        Ok(values) => values,
        Err(errors) => return redisplay(entity, id, &data, &errors),
    };

    let mut errors = FormErrors::default();
    for name in CrudService::unique_conflicts(&state.db, entity, &values, id).await? {
        if let Some(field) = entity.field(&name) {
            errors.add(&name, unique_message(entity, field));
        }
    }
    if !errors.is_empty() {
        return redisplay(entity, id, &data, &errors);
    }

    write(state, entity, id, &values, &data, errors).await
}

/// Insert or update already-cleaned values. A constraint violation from the database
/// re-renders the form with a non-field error.
async fn write(
    state: &AppState,
    entity: &ResolvedEntity,
    id: Option<i64>,
    values: &[(String, FieldValue)],
    data: &HashMap<String, String>,
    mut errors: FormErrors,
) -> Result<Response, AppError> {
    let saved = match id {
        None => CrudService::create(&state.db, entity, values).await.map(Some),
        Some(id) => CrudService::update(&state.db, entity, id, values).await,
    };
    match saved {
        Ok(Some(_)) => Ok(Redirect::to(&changelist_url(entity)).into_response()),
        Ok(None) => Err(missing(entity, id.unwrap_or_default())),
        // Lost a race with another writer between the pre-check and the write.
        Err(AppError::Conflict(detail)) => {
            tracing::warn!(entity = %entity.id, %detail, "unique constraint rejected write");
            errors.add_non_field(conflict_message(entity));
            redisplay(entity, id, data, &errors)
        }
        Err(e) => Err(e),
    }
}

fn conflict_message(entity: &ResolvedEntity) -> String {
    let mut unique = entity.unique_fields();
    match (unique.next(), unique.next()) {
        (Some(field), None) => unique_message(entity, field),
        _ => format!("{} with these values already exists.", entity.verbose_name),
    }
}

fn redisplay(
    entity: &ResolvedEntity,
    id: Option<i64>,
    data: &HashMap<String, String>,
    errors: &FormErrors,
) -> Result<Response, AppError> {
    let page = ChangeFormPage::bound(entity, id, data, errors);
    Ok(render(&page)?.into_response())
}
