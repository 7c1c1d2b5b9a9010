use oauth2_app_registry::AppResources;
use oauth2_app_registry::api::start_webserver;
use oauth2_app_registry::config::load_config;
use sea_orm::Database;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_standard_tracing() {
    let default_directives = "oauth2_app_registry=info,tower_http=info,sea_orm=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    // A missing .env file is fine; the environment may already be set
    dotenvy::dotenv().ok();

    initialize_standard_tracing();

    let config = Arc::new(load_config()?);
    tracing::info!(
        listen_addr = %config.listen_addr,
        owner_header = %config.auth.owner_header,
        max_client_id_attempts = config.applications.max_client_id_attempts,
        "configuration loaded"
    );

    let db = Arc::new(Database::connect(&config.database_url).await?);

    let resources = AppResources::new(db, config);
    start_webserver(resources).await?;
    Ok(())
}
