use color_eyre::Result;
use flight_checker::{
    api::FlightProvider,
    app::App,
    config::{ApiKey, Config},
    console::Console,
    logging,
};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging();
    color_eyre::install()?;

    // The credential is checked before anything can reach the network.
    let key = match ApiKey::from_env() {
        Ok(key) => key,
        Err(e) => {
            error!("Startup aborted: {}", e);
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let config = Config::load();
    let provider = FlightProvider::new(&config.api, &config.flights, key)?;
    let console = Console::stdio(config.ui.color);

    let mut app = App::new(console, provider, config);
    app.run().await?;

    info!("Session ended.");
    Ok(ExitCode::SUCCESS)
}
