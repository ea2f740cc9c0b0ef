use sharebox_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    sharebox_api::telemetry::init_tracing();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, storage, services, routes)
    let (_state, router) = sharebox_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    sharebox_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
