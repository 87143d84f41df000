use std::sync::Arc;

use display::ConsoleDisplay;
use monitor::{Config, FlightMonitoring, MemoryFlightStore, PriceMonitor};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let prices = Arc::new(PriceMonitor::new(config.price_seed));
    let monitoring = Arc::new(FlightMonitoring::new(
        MemoryFlightStore::default(),
        ConsoleDisplay::stdout(),
        Arc::clone(&prices),
    ));

    for id in &config.followed_flights {
        monitoring.follow_flight(id)?;
    }
    for id in &config.monitored_flights {
        monitoring.monitor_flight(id)?;
    }

    let price_updates = prices.start(config.price_update_interval);
    let display = monitoring.start(config.display_interval);

    log::info!(
        "following {} flights, displaying {}",
        prices.len(),
        monitoring.monitored_len()
    );

    tokio::signal::ctrl_c().await?;

    futures::join!(price_updates.stop(), display.stop());

    Ok(())
}
