//! Per-tool pages: the upload form and the upload-convert-respond pipeline.

use askama::Template;
use axum::extract::{Multipart, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::convert;
use crate::error::AppError;
use crate::state::AppState;
use crate::tools;
use crate::upload;

#[derive(Template)]
#[template(path = "tool.html")]
pub struct ToolTemplate {
  pub site_name: String,
  pub title: &'static str,
  pub description: &'static str,
  pub slug: &'static str,
  pub accept: &'static str,
  pub multiple: bool,
}

pub async fn tool_form(Path(slug): Path<String>, State(state): State<AppState>) -> Response {
  let Some(tool) = tools::lookup(&slug) else {
    return AppError::NotFound.into_response();
  };

  let template = ToolTemplate {
    site_name: state.config.site_name.clone(),
    title: tool.title,
    description: tool.description,
    slug: tool.slug,
    accept: tool.accept,
    multiple: tool.multiple,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

pub async fn tool_convert(
  Path(slug): Path<String>,
  State(state): State<AppState>,
  multipart: Multipart,
) -> Response {
  let Some(tool) = tools::lookup(&slug) else {
    return AppError::NotFound.into_response();
  };

  // `files` owns the scratch paths; dropping it removes them on every
  // exit path below, success and failure alike
  let files = match upload::receive(multipart, &state.config).await {
    Ok(files) => files,
    Err(AppError::EmptyUpload) => {
      return Redirect::to(&format!("/tool/{}", tool.slug)).into_response();
    }
    Err(e) => return e.into_response(),
  };

  match convert::convert(tool.kind, &files).await {
    Ok(result) => result.into_response(),
    Err(e) => {
      tracing::warn!("Conversion failed for {}: {}", tool.slug, e);
      AppError::from(e).into_response()
    }
  }
}
