use filedrop_api::{setup, telemetry};
use filedrop_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_tracing();

    // Load configuration; a missing required value is fatal here, not per request
    let config = Config::from_env()?;

    // Initialize the application (storage backend, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
