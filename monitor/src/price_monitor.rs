use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{FlightId, Periodic, Price, PriceUpdateConsumer, TickReport};

use crate::Ticker;

/// Range from which synthetic prices are drawn (upper bound exclusive)
pub const PRICE_RANGE: Range<u32> = 80..120;

/// Pushes a freshly drawn price to every registered consumer on each tick.
/// All consumers share a single random sequence.
pub struct PriceMonitor {
    /// One consumer per flight, re-registering replaces the previous one
    consumers: DashMap<FlightId, Arc<dyn PriceUpdateConsumer>>,
    rng: Mutex<StdRng>,
}

impl PriceMonitor {
    pub const DEFAULT_SEED: u64 = 314;

    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            consumers: DashMap::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Register `consumer` to receive price updates for `id`
    pub fn follow_price<C>(&self, id: FlightId, consumer: C)
    where
        C: PriceUpdateConsumer + 'static,
    {
        log::info!("monitoring the price for {}", id);
        if self.consumers.insert(id, Arc::new(consumer)).is_some() {
            log::debug!("replaced previous price consumer");
        }
    }

    pub fn is_following(&self, id: &FlightId) -> bool {
        self.consumers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    /// Begin pushing prices every `period`, starting immediately
    pub fn start(self: &Arc<Self>, period: Duration) -> Ticker {
        Ticker::spawn(Arc::clone(self), period)
    }

    fn next_price(&self) -> Price {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Price(rng.gen_range(PRICE_RANGE))
    }
}

impl Default for PriceMonitor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl Periodic for PriceMonitor {
    fn name(&self) -> &'static str {
        "price monitor"
    }

    fn tick(&self) -> TickReport {
        // No shard lock may be held while consumers run: a consumer is free to re-register
        let consumers = self
            .consumers
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect::<Vec<_>>();

        let mut report = TickReport::default();
        for (id, consumer) in consumers {
            let price = self.next_price();
            report.visited += 1;

            match panic::catch_unwind(AssertUnwindSafe(|| consumer.update_flight(price))) {
                Ok(Ok(())) => log::debug!("new price for {}: {}", id, price),
                Ok(Err(e)) => {
                    report.failed += 1;
                    log::warn!("could not update price for {}: {}", id, e);
                }
                Err(_) => {
                    report.failed += 1;
                    log::warn!("price consumer for {} panicked", id);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use schema::UpdateError;

    use super::*;

    fn recorder(prices: &Arc<Mutex<Vec<Price>>>) -> impl PriceUpdateConsumer + 'static {
        let prices = Arc::clone(prices);
        move |price: Price| -> Result<(), UpdateError> {
            prices.lock().expect("prices").push(price);
            Ok(())
        }
    }

    #[test]
    fn test_tick_without_consumers() {
        let monitor = PriceMonitor::default();

        assert!(monitor.is_empty());
        assert_eq!(monitor.tick(), TickReport::default());
    }

    #[test]
    fn test_each_consumer_invoked_once_per_tick() {
        let monitor = PriceMonitor::default();
        let received = (0..5)
            .map(|i| {
                let prices = Arc::new(Mutex::new(vec![]));
                monitor.follow_price(FlightId::new(format!("F{i}")), recorder(&prices));
                prices
            })
            .collect::<Vec<_>>();

        let report = monitor.tick();

        assert_eq!(report.visited, 5);
        assert_eq!(report.failed, 0);
        for prices in received {
            let prices = prices.lock().expect("prices");
            assert_eq!(prices.len(), 1);
            assert!(PRICE_RANGE.contains(&prices[0].amount()));
        }
    }

    #[test]
    fn test_prices_follow_seeded_sequence() {
        let monitor = PriceMonitor::new(7);
        let prices = Arc::new(Mutex::new(vec![]));
        monitor.follow_price(FlightId::new("PaAt"), recorder(&prices));

        for _ in 0..10 {
            monitor.tick();
        }

        let mut rng = StdRng::seed_from_u64(7);
        let expected = (0..10)
            .map(|_| Price(rng.gen_range(PRICE_RANGE)))
            .collect::<Vec<_>>();
        assert_eq!(*prices.lock().expect("prices"), expected);
    }

    #[test]
    fn test_refollow_replaces_consumer() {
        let monitor = PriceMonitor::default();
        let first = Arc::new(Mutex::new(vec![]));
        let second = Arc::new(Mutex::new(vec![]));
        monitor.follow_price(FlightId::new("AmNY"), recorder(&first));
        monitor.follow_price(FlightId::new("AmNY"), recorder(&second));

        let report = monitor.tick();

        assert_eq!(monitor.len(), 1);
        assert_eq!(report.visited, 1);
        assert!(first.lock().expect("prices").is_empty());
        assert_eq!(second.lock().expect("prices").len(), 1);
    }

    #[test]
    fn test_failing_consumers_are_isolated() {
        let monitor = PriceMonitor::default();
        monitor.follow_price(
            FlightId::new("PaAt"),
            |_: Price| -> Result<(), UpdateError> { Err(UpdateError("closed".to_string())) },
        );
        monitor.follow_price(
            FlightId::new("AmNY"),
            |_: Price| -> Result<(), UpdateError> { panic!("consumer blew up") },
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        monitor.follow_price(
            FlightId::new("LoMi"),
            move |_: Price| -> Result<(), UpdateError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );

        let first = monitor.tick();
        let second = monitor.tick();

        assert_eq!(first.visited, 3);
        assert_eq!(first.failed, 2);
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_consumer_may_register_during_tick() {
        let monitor = Arc::new(PriceMonitor::default());
        let registering = Arc::clone(&monitor);
        monitor.follow_price(
            FlightId::new("PaAt"),
            move |_: Price| -> Result<(), UpdateError> {
                registering.follow_price(
                    FlightId::new("FrWa"),
                    |_: Price| -> Result<(), UpdateError> { Ok(()) },
                );
                Ok(())
            },
        );

        let report = monitor.tick();

        assert_eq!(report.visited, 1);
        assert!(monitor.is_following(&FlightId::new("FrWa")));
        assert_eq!(monitor.tick().visited, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_until_stopped() {
        let monitor = Arc::new(PriceMonitor::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        monitor.follow_price(
            FlightId::new("LoMi"),
            move |_: Price| -> Result<(), UpdateError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );

        let ticker = monitor.start(Duration::from_millis(500));
        tokio::time::sleep(Duration::from_millis(1250)).await;
        ticker.stop().await;

        // Fires at 0ms, 500ms and 1000ms
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
