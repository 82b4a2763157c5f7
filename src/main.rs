use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filetools::config::AppConfig;
use filetools::routes::create_router;
use filetools::state::AppState;

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "filetools=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = AppConfig::load();
  std::fs::create_dir_all(&config.scratch_dir).unwrap_or_else(|e| {
    panic!(
      "Failed to create scratch directory {}: {}",
      config.scratch_dir.display(),
      e
    )
  });

  tracing::info!(
    "Site: {} <{}>, upload limit {} MB",
    config.site_name,
    config.site_url,
    config.max_upload_mb
  );

  let bind_addr = config.server_bind_addr();
  let app = create_router(AppState::new(config));

  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
