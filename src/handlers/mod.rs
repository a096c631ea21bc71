//! HTTP handlers for the public listing and the admin scaffold.

pub mod admin;
pub mod listing;

use crate::error::AppError;
use askama::Template;
use axum::response::Html;

/// Render a page, mapping template failures to a 500.
pub(crate) fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}
