use event_scheduler::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting event scheduler");

    // Load configuration
    let config = startup::load_config().await?;

    // Serve the API and run the reminder scanner
    startup::start_server(config).await
}
