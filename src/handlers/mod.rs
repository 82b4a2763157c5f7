pub mod seo;
pub mod tool;

use askama::Template;
use axum::extract::State;
use axum::response::Html;

use crate::state::AppState;
use crate::tools::{self, ToolDescriptor};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub site_name: String,
  pub tools: &'static [ToolDescriptor],
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
  let template = IndexTemplate {
    site_name: state.config.site_name.clone(),
    tools: &tools::TOOLS,
  };
  Html(template.render().unwrap_or_default())
}

#[derive(Template)]
#[template(path = "how-to-use.html")]
pub struct HowToUseTemplate {
  pub site_name: String,
}

pub async fn how_to_use(State(state): State<AppState>) -> Html<String> {
  let template = HowToUseTemplate {
    site_name: state.config.site_name.clone(),
  };
  Html(template.render().unwrap_or_default())
}

pub use seo::{robots_txt, sitemap_xml};
pub use tool::{tool_convert, tool_form};
