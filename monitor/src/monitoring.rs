use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use schema::{
    Flight, FlightDisplaySink, FlightId, FlightStore, Periodic, Price, StoreError, TickReport,
    UpdateError,
};

use crate::{PriceMonitor, Ticker};

/// Wires flights from a `FlightStore` into a `PriceMonitor` and periodically renders
/// the monitored subset of them to a `FlightDisplaySink`.
///
/// Following a flight makes its price change; monitoring it makes it visible.
/// The two are independent: a monitored flight nobody follows keeps its initial price.
pub struct FlightMonitoring<S, D> {
    store: S,
    display: D,
    prices: Arc<PriceMonitor>,
    /// Flights rendered on every display round
    monitored: DashMap<FlightId, Arc<Flight>>,
}

impl<S, D> FlightMonitoring<S, D>
where
    S: FlightStore + 'static,
    D: FlightDisplaySink + 'static,
{
    pub fn new(store: S, display: D, prices: Arc<PriceMonitor>) -> Self {
        Self {
            store,
            display,
            prices,
            monitored: DashMap::new(),
        }
    }

    /// Have the price monitor push its updates into the flight for `id`.
    /// Following the same flight again replaces the previous registration.
    pub fn follow_flight(&self, id: &FlightId) -> Result<Arc<Flight>, StoreError> {
        let flight = self.store.fetch_or_create(id)?;

        let target = Arc::clone(&flight);
        self.prices.follow_price(
            id.clone(),
            move |price: Price| -> Result<(), UpdateError> {
                target.update_price(price);
                Ok(())
            },
        );

        Ok(flight)
    }

    /// Add the flight for `id` to the set rendered on every display round
    pub fn monitor_flight(&self, id: &FlightId) -> Result<Arc<Flight>, StoreError> {
        let flight = self.store.fetch_or_create(id)?;

        log::info!("displaying flight {}", id);
        self.monitored.insert(id.clone(), Arc::clone(&flight));

        Ok(flight)
    }

    pub fn is_monitored(&self, id: &FlightId) -> bool {
        self.monitored.contains_key(id)
    }

    pub fn monitored_len(&self) -> usize {
        self.monitored.len()
    }

    pub fn price_monitor(&self) -> &Arc<PriceMonitor> {
        &self.prices
    }

    /// Begin rendering monitored flights every `period`, starting immediately
    pub fn start(self: &Arc<Self>, period: Duration) -> Ticker {
        Ticker::spawn(Arc::clone(self), period)
    }
}

impl<S, D> Periodic for FlightMonitoring<S, D>
where
    S: FlightStore + 'static,
    D: FlightDisplaySink + 'static,
{
    fn name(&self) -> &'static str {
        "flight display"
    }

    fn tick(&self) -> TickReport {
        let flights = self
            .monitored
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect::<Vec<_>>();

        let mut report = TickReport::default();
        for flight in flights {
            report.visited += 1;

            match panic::catch_unwind(AssertUnwindSafe(|| self.display.display_flight(&flight))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    report.failed += 1;
                    log::warn!("could not display flight {}: {}", flight.id, e);
                }
                Err(_) => {
                    report.failed += 1;
                    log::warn!("display of flight {} panicked", flight.id);
                }
            }
        }

        report
    }
}
