use route_guard::{config::Config, error::Error, guard_server::GuardServer};
use tracing::{info, warn, Level};

#[cfg(feature = "debug-logging")]
const LOG_LEVEL: Level = Level::DEBUG;
#[cfg(not(feature = "debug-logging"))]
const LOG_LEVEL: Level = Level::INFO;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_max_level(LOG_LEVEL)
        .with_writer(writer)
        .init();

    let config = Config::load()?;
    info!(
        "Guarding {} and {} using cookie '{}', public API URL {}",
        config.get_guard().get_login_path(),
        config.get_guard().get_dashboard_path(),
        config.get_cookie_name(),
        config.get_public().api_url,
    );

    let guard_server = GuardServer::builder().config(config).start_server().await?;

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for shutdown signal: {}", err);
    }
    info!("Shutting down");
    guard_server.signals.stop();
    guard_server.wait().await;
    Ok(())
}
