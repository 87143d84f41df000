use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use schema::{City, Flight, FlightId, FlightStore, StoreError};

static CITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Pa", "Paris"),
        ("Lo", "London"),
        ("Am", "Amsterdam"),
        ("Fr", "Frankfurt"),
        ("NY", "New York"),
        ("Wa", "Washington"),
        ("At", "Atlanta"),
        ("Mi", "Miami"),
    ])
});

/// In-memory `FlightStore` which creates each flight on first access
/// and hands out the same instance from then on
#[derive(Default)]
pub struct MemoryFlightStore {
    flights: DashMap<FlightId, Arc<Flight>>,
}

impl MemoryFlightStore {
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    fn city(code: &str) -> Result<City, StoreError> {
        CITIES
            .get(code)
            .map(|name| City::new(code, name))
            .ok_or_else(|| StoreError::UnknownCity(code.to_string()))
    }

    fn create(id: &FlightId) -> Result<Flight, StoreError> {
        let route = id.route()?;
        let via = route.via.as_deref().map(Self::city).transpose()?;

        Ok(Flight::new(
            id.clone(),
            Self::city(&route.from)?,
            via,
            Self::city(&route.to)?,
        ))
    }
}

impl FlightStore for MemoryFlightStore {
    fn fetch_or_create(&self, id: &FlightId) -> Result<Arc<Flight>, StoreError> {
        if let Some(flight) = self.flights.get(id) {
            return Ok(Arc::clone(flight.value()));
        }

        // The entry lock makes creation race-free: concurrent callers all get one instance
        let flight = self.flights.entry(id.clone()).or_try_insert_with(|| {
            log::debug!("creating flight {}", id);
            Self::create(id).map(Arc::new)
        })?;

        Ok(Arc::clone(flight.value()))
    }
}
