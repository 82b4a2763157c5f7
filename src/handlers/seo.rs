//! Crawler endpoints: robots.txt and sitemap.xml, built from the
//! configured base site URL.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::state::AppState;
use crate::tools;

pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
  let body = format!(
    "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
    state.config.site_base()
  );
  ([(header::CONTENT_TYPE, "text/plain")], body)
}

pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
  let base = state.config.site_base();
  let lastmod = chrono::Utc::now().format("%Y-%m-%d");

  let mut urls: Vec<String> = vec!["/".to_string(), "/how-to-use".to_string()];
  urls.extend(tools::TOOLS.iter().map(|t| format!("/tool/{}", t.slug)));

  let mut xml = String::from(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
  );
  for url in urls {
    xml.push_str(&format!(
      "<url><loc>{}{}</loc><lastmod>{}</lastmod></url>\n",
      base, url, lastmod
    ));
  }
  xml.push_str("</urlset>\n");

  ([(header::CONTENT_TYPE, "application/xml")], xml)
}
