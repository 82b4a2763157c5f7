//! Router assembly.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
  let max_body = state.config.max_upload_bytes();

  Router::new()
    .route("/", get(handlers::index))
    .route("/how-to-use", get(handlers::how_to_use))
    .route("/robots.txt", get(handlers::robots_txt))
    .route("/sitemap.xml", get(handlers::sitemap_xml))
    .route("/tool/{slug}", get(handlers::tool_form).post(handlers::tool_convert))
    .nest_service("/static", ServeDir::new("static"))
    .layer(DefaultBodyLimit::max(max_body))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
